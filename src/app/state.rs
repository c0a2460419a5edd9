// ==========================================
// 车队物流排班模拟系统 - 应用状态
// ==========================================
// 职责: 打开共享连接、建表、装配仓储与 API 实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{DashboardApi, FleetApi, SimulationApi};
use crate::config::{ConfigManager, SimulationConfigReader};
use crate::db::{init_schema, open_sqlite_connection};
use crate::importer::FleetCsvImporter;
use crate::perf::install_sqlite_tracing;
use crate::repository::{
    DriverRepository, FleetSnapshotRepository, OrderRepository, RouteRepository,
    SimulationRunRepository,
};
use rusqlite::Connection;

/// 数据库路径环境变量
pub const ENV_DB_PATH: &str = "FLEET_SIM_DB_PATH";

/// 应用状态
///
/// 所有仓储共享同一个 `Arc<Mutex<Connection>>`
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 共享连接
    pub conn: Arc<Mutex<Connection>>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 模拟API
    pub simulation_api: Arc<SimulationApi>,

    /// 车队管理API
    pub fleet_api: Arc<FleetApi>,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,

    /// 样例数据导入器
    pub importer: Arc<FleetCsvImporter>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 1. 打开连接并应用统一 PRAGMA
    /// 2. 幂等建表
    /// 3. 装配仓储与 API
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let mut conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        install_sqlite_tracing(&mut conn);
        init_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;

        Self::from_connection(db_path, Arc::new(Mutex::new(conn)))
    }

    /// 从已建表的连接装配（测试复用）
    pub fn from_connection(db_path: String, conn: Arc<Mutex<Connection>>) -> Result<Self, String> {
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let config_reader: Arc<dyn SimulationConfigReader> = config_manager.clone();

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let driver_repo = Arc::new(DriverRepository::from_connection(conn.clone()));
        let route_repo = Arc::new(RouteRepository::from_connection(conn.clone()));
        let order_repo = Arc::new(OrderRepository::from_connection(conn.clone()));
        let snapshot_repo = Arc::new(FleetSnapshotRepository::from_connection(conn.clone()));
        let run_repo = Arc::new(SimulationRunRepository::from_connection(conn.clone()));

        // ==========================================
        // 初始化API层
        // ==========================================
        let simulation_api = Arc::new(SimulationApi::new(
            snapshot_repo,
            run_repo.clone(),
            config_reader.clone(),
        ));
        let fleet_api = Arc::new(FleetApi::new(driver_repo, route_repo, order_repo, config_reader));
        let dashboard_api = Arc::new(DashboardApi::new(run_repo));
        let importer = Arc::new(FleetCsvImporter::new(conn.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            conn,
            config_manager,
            simulation_api,
            fleet_api,
            dashboard_api,
            importer,
        })
    }
}

/// 默认数据库路径
///
/// 优先级: FLEET_SIM_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(ENV_DB_PATH) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./fleet_sim.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        let dir = data_dir.join("fleet-logistics-sim-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("fleet-logistics-sim");

        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("fleet_sim.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_wires_in_memory_db() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let state = AppState::from_connection(":memory:".to_string(), Arc::new(Mutex::new(conn))).unwrap();

        assert!(state.fleet_api.list_drivers().unwrap().is_empty());
        assert_eq!(state.dashboard_api.get_dashboard().unwrap().run_count, 0);
    }

    #[test]
    fn test_default_db_path_is_not_empty() {
        assert!(!get_default_db_path().is_empty());
    }
}
