// ==========================================
// 车队物流排班模拟系统 - 运行记录器
// ==========================================
// 职责: 为一次成功的模拟生成 SimulationRun 并追加到历史
// 红线: 只追加; 已记录的运行不可修改、不可覆盖
// ==========================================

use crate::domain::simulation::{KpiSummary, PerOrderResult, SimulationInput, SimulationRun};
use crate::repository::error::RepositoryResult;
use chrono::{NaiveDateTime, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 运行历史存储（只追加）
///
/// 实现方必须保证并发追加互不丢失
pub trait RunHistoryStore: Send + Sync {
    /// 追加一条运行记录
    fn append_run(&self, run: &SimulationRun) -> RepositoryResult<()>;

    /// 按时间倒序列出运行记录（最新在前）
    fn list_runs(&self, limit: Option<usize>) -> RepositoryResult<Vec<SimulationRun>>;
}

pub struct RunRecorder {
    store: Arc<dyn RunHistoryStore>,
}

impl RunRecorder {
    pub fn new(store: Arc<dyn RunHistoryStore>) -> Self {
        Self { store }
    }

    /// 构造运行记录（新 run_id + 当前时间）
    pub fn build_run(
        inputs: SimulationInput,
        summary: KpiSummary,
        order_results: Vec<PerOrderResult>,
        timestamp: NaiveDateTime,
    ) -> SimulationRun {
        SimulationRun {
            run_id: Uuid::new_v4().to_string(),
            timestamp,
            inputs,
            results: summary,
            order_results,
        }
    }

    /// 记录一次成功的模拟
    pub fn record(
        &self,
        inputs: SimulationInput,
        summary: KpiSummary,
        order_results: Vec<PerOrderResult>,
    ) -> RepositoryResult<SimulationRun> {
        let run = Self::build_run(inputs, summary, order_results, Utc::now().naive_utc());
        self.store.append_run(&run)?;

        info!(
            run_id = %run.run_id,
            total_profit = run.results.total_profit,
            efficiency_score = run.results.efficiency_score,
            "模拟运行已记录"
        );
        Ok(run)
    }

    /// 历史（最新在前）
    pub fn history(&self, limit: Option<usize>) -> RepositoryResult<Vec<SimulationRun>> {
        self.store.list_runs(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryHistory {
        runs: Mutex<Vec<SimulationRun>>,
    }

    impl RunHistoryStore for MemoryHistory {
        fn append_run(&self, run: &SimulationRun) -> RepositoryResult<()> {
            self.runs.lock().unwrap().push(run.clone());
            Ok(())
        }

        fn list_runs(&self, limit: Option<usize>) -> RepositoryResult<Vec<SimulationRun>> {
            let runs = self.runs.lock().unwrap();
            let mut out: Vec<SimulationRun> = runs.iter().rev().cloned().collect();
            if let Some(limit) = limit {
                out.truncate(limit);
            }
            Ok(out)
        }
    }

    #[test]
    fn test_record_appends_with_unique_ids() {
        let store = Arc::new(MemoryHistory::default());
        let recorder = RunRecorder::new(store.clone());

        let first = recorder
            .record(SimulationInput::new(1, "09:00", 8.0), KpiSummary::empty(), Vec::new())
            .unwrap();
        let second = recorder
            .record(SimulationInput::new(2, "10:00", 8.0), KpiSummary::empty(), Vec::new())
            .unwrap();

        assert_ne!(first.run_id, second.run_id);

        let history = recorder.history(None).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].run_id, second.run_id);
        assert_eq!(history[1].run_id, first.run_id);

        let limited = recorder.history(Some(1)).unwrap();
        assert_eq!(limited.len(), 1);
    }
}
