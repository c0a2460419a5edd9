// ==========================================
// 车队物流排班模拟系统 - 驾驶舱 API
// ==========================================
// 职责: 最近一次模拟的 KPI 汇总 + 历史运行数
// 无运行记录时返回全零汇总
// ==========================================

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiResult;
use crate::domain::simulation::{KpiSummary, SimulationInput};
use crate::perf::PerfGuard;
use crate::repository::SimulationRunRepository;

/// 驾驶舱视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub latest_run_id: Option<String>,
    pub latest_run_at: Option<NaiveDateTime>,
    pub latest_inputs: Option<SimulationInput>,
    pub summary: KpiSummary,
    pub run_count: usize,
}

pub struct DashboardApi {
    run_repo: Arc<SimulationRunRepository>,
}

impl DashboardApi {
    pub fn new(run_repo: Arc<SimulationRunRepository>) -> Self {
        Self { run_repo }
    }

    pub fn get_dashboard(&self) -> ApiResult<DashboardView> {
        let _perf = PerfGuard::new("get_dashboard");

        let run_count = self.run_repo.count()?;
        let view = match self.run_repo.latest()? {
            Some(run) => DashboardView {
                latest_run_id: Some(run.run_id),
                latest_run_at: Some(run.timestamp),
                latest_inputs: Some(run.inputs),
                summary: run.results,
                run_count,
            },
            None => DashboardView {
                latest_run_id: None,
                latest_run_at: None,
                latest_inputs: None,
                summary: KpiSummary::empty(),
                run_count,
            },
        };
        Ok(view)
    }
}
