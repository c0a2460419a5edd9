// ==========================================
// 车队物流排班模拟系统 - 引擎层
// ==========================================
// 职责: 疲劳 / 成本 / 分配 / 评估 / KPI / 记录
// 红线: Engine 不拼 SQL; 引擎计算为纯函数,只有记录器写历史
// ==========================================

pub mod allocator;
pub mod cost;
pub mod error;
pub mod evaluator;
pub mod fatigue;
pub mod kpi;
pub mod orchestrator;
pub mod recorder;

// 重导出核心引擎
pub use allocator::{Allocation, Allocator};
pub use cost::CostModel;
pub use error::{EngineError, EngineResult};
pub use evaluator::OutcomeEvaluator;
pub use fatigue::FatigueModel;
pub use kpi::KpiAggregator;
pub use orchestrator::{SimulationEngine, SimulationOutcome};
pub use recorder::{RunHistoryStore, RunRecorder};
