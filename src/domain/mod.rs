// ==========================================
// 车队物流排班模拟系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、模拟结果
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod fleet;
pub mod simulation;
pub mod types;

// 重导出核心类型
pub use fleet::{Driver, DriverSummary, FleetSnapshot, Order, OrderSummary, Route};
pub use simulation::{
    parse_start_time, ChartPoint, KpiSummary, PerOrderResult, SimulationInput, SimulationRun,
};
pub use types::{FatigueStatus, OrderPriority, RouteEfficiency, TrafficLevel};
