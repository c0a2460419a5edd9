// ==========================================
// 车队物流排班模拟系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行/外部请求层调用
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod fleet_api;
pub mod simulation_api;
pub mod validator;

// 重导出核心类型
pub use dashboard_api::{DashboardApi, DashboardView};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use fleet_api::{DriverView, FleetApi, OrderView, RouteView};
pub use simulation_api::SimulationApi;
pub use validator::{EntityValidator, FieldViolation, SimulationRequestValidator};
