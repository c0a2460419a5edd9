// ==========================================
// 车队物流排班模拟系统 - 模拟 API
// ==========================================
// 流程: 读一致快照 -> 请求校验 -> 读取参数 -> 引擎计算 -> 追加历史
// 红线: 任一环节失败都不写历史; 成功才返回 SimulationRun
// ==========================================

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::SimulationRequestValidator;
use crate::config::SimulationConfigReader;
use crate::domain::simulation::{SimulationInput, SimulationRun};
use crate::engine::{RunRecorder, SimulationEngine};
use crate::perf::PerfGuard;
use crate::repository::{FleetSnapshotRepository, SimulationRunRepository};

// ==========================================
// SimulationApi - 模拟 API
// ==========================================
pub struct SimulationApi {
    snapshot_repo: Arc<FleetSnapshotRepository>,
    run_repo: Arc<SimulationRunRepository>,
    config: Arc<dyn SimulationConfigReader>,
    recorder: RunRecorder,
}

impl SimulationApi {
    pub fn new(
        snapshot_repo: Arc<FleetSnapshotRepository>,
        run_repo: Arc<SimulationRunRepository>,
        config: Arc<dyn SimulationConfigReader>,
    ) -> Self {
        Self {
            recorder: RunRecorder::new(run_repo.clone()),
            snapshot_repo,
            run_repo,
            config,
        }
    }

    /// 执行一次模拟并记录
    ///
    /// # 返回
    /// - Ok(SimulationRun): 已追加到历史的运行记录
    /// - Err(ApiError): ValidationError / ReferenceError / ConfigError / DatabaseError
    #[instrument(skip(self, input), fields(
        available_drivers = input.available_drivers,
        start_time = %input.start_time,
        max_hours_per_day = input.max_hours_per_day
    ))]
    pub async fn run_simulation(&self, input: SimulationInput) -> ApiResult<SimulationRun> {
        let _perf = PerfGuard::new("run_simulation");

        let snapshot = self.snapshot_repo.load_snapshot()?;
        SimulationRequestValidator::validate(&input, snapshot.drivers.len())?;

        let params = self
            .config
            .load_simulation_parameters()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        params.validate().map_err(ApiError::ConfigError)?;

        let engine = SimulationEngine::new(params);
        let outcome = engine.run(&snapshot, &input).map_err(|e| {
            warn!(error = %e, kind = e.kind(), "模拟失败,不写入历史");
            ApiError::from(e)
        })?;

        let run = self
            .recorder
            .record(input, outcome.summary, outcome.order_results)?;

        info!(run_id = %run.run_id, "模拟请求完成");
        Ok(run)
    }

    /// 历史运行（最新在前）
    pub fn list_runs(&self, limit: Option<usize>) -> ApiResult<Vec<SimulationRun>> {
        let _perf = PerfGuard::new("list_runs");
        Ok(self.recorder.history(limit)?)
    }

    pub fn get_run(&self, run_id: &str) -> ApiResult<SimulationRun> {
        self.run_repo
            .find_by_id(run_id)?
            .ok_or_else(|| ApiError::NotFound(format!("SimulationRun(id={})不存在", run_id)))
    }
}
