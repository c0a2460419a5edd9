// ==========================================
// 车队物流排班模拟系统 - 模拟运行历史仓储
// ==========================================
// 存储: simulation_run 表 (seq 自增, 只追加)
// 红线: 不提供 update/delete; 追加为单事务插入
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::simulation::SimulationRun;
use crate::engine::recorder::RunHistoryStore;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

/// 运行时间戳文本格式（保留小数秒）
const RUN_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const SELECT_COLUMNS: &str =
    "SELECT run_id, created_at, inputs_json, summary_json, order_results_json FROM simulation_run";

fn json_column<T: serde::de::DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn map_run_row(row: &Row<'_>) -> rusqlite::Result<SimulationRun> {
    let raw_ts: String = row.get(1)?;
    let timestamp = NaiveDateTime::parse_from_str(&raw_ts, RUN_TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

    Ok(SimulationRun {
        run_id: row.get(0)?,
        timestamp,
        inputs: json_column(row, 2)?,
        results: json_column(row, 3)?,
        order_results: json_column(row, 4)?,
    })
}

// ==========================================
// SimulationRunRepository - 运行历史仓储
// ==========================================
pub struct SimulationRunRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SimulationRunRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 追加一条运行记录（单事务）
    pub fn append(&self, run: &SimulationRun) -> RepositoryResult<()> {
        let inputs_json = serde_json::to_string(&run.inputs)?;
        let summary_json = serde_json::to_string(&run.results)?;
        let order_results_json = serde_json::to_string(&run.order_results)?;

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO simulation_run (run_id, created_at, inputs_json, summary_json, order_results_json)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                run.run_id,
                run.timestamp.format(RUN_TIMESTAMP_FORMAT).to_string(),
                inputs_json,
                summary_json,
                order_results_json,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// 按追加顺序倒序列出（最新在前）
    pub fn list_runs(&self, limit: Option<usize>) -> RepositoryResult<Vec<SimulationRun>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY seq DESC LIMIT ?1", SELECT_COLUMNS))?;
        // SQLite 中 LIMIT -1 表示不限
        let limit = limit.map(|n| n as i64).unwrap_or(-1);
        let runs = stmt
            .query_map(params![limit], map_run_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(runs)
    }

    pub fn find_by_id(&self, run_id: &str) -> RepositoryResult<Option<SimulationRun>> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            &format!("{} WHERE run_id = ?1", SELECT_COLUMNS),
            params![run_id],
            map_run_row,
        );

        match result {
            Ok(run) => Ok(Some(run)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 最近一次运行
    pub fn latest(&self) -> RepositoryResult<Option<SimulationRun>> {
        Ok(self.list_runs(Some(1))?.into_iter().next())
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM simulation_run", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

impl RunHistoryStore for SimulationRunRepository {
    fn append_run(&self, run: &SimulationRun) -> RepositoryResult<()> {
        self.append(run)
    }

    fn list_runs(&self, limit: Option<usize>) -> RepositoryResult<Vec<SimulationRun>> {
        SimulationRunRepository::list_runs(self, limit)
    }
}
