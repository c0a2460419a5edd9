// ==========================================
// 车队物流排班模拟系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 排班模拟与 KPI 计算 (人工决策参考)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 样例数据
pub mod importer;

// 配置层 - 业务参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{FatigueStatus, OrderPriority, RouteEfficiency, TrafficLevel};

// 领域实体
pub use domain::{
    ChartPoint, Driver, FleetSnapshot, KpiSummary, Order, PerOrderResult, Route, SimulationInput,
    SimulationRun,
};

// 引擎
pub use engine::{
    Allocator, CostModel, EngineError, FatigueModel, KpiAggregator, OutcomeEvaluator, RunRecorder,
    SimulationEngine, SimulationOutcome,
};

// API
pub use api::{ApiError, DashboardApi, ErrorResponse, FleetApi, SimulationApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "车队物流排班模拟系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
