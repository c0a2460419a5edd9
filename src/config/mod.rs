// ==========================================
// 车队物流排班模拟系统 - 配置层
// ==========================================
// 职责: 模拟业务参数管理,支持全局覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod simulation_config_trait;
pub mod simulation_params;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use simulation_config_trait::SimulationConfigReader;
pub use simulation_params::SimulationParameters;
