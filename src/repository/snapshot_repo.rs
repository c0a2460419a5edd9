// ==========================================
// 车队物流排班模拟系统 - 车队快照读取
// ==========================================
// 红线: 同一把锁、同一个事务内读取司机/线路/订单
// 保证一次模拟看到的是一致快照
// ==========================================

use crate::domain::fleet::FleetSnapshot;
use crate::repository::driver_repo::list_drivers_on;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::order_repo::list_orders_on;
use crate::repository::route_repo::list_routes_on;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::debug;

pub struct FleetSnapshotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl FleetSnapshotRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取一致快照
    pub fn load_snapshot(&self) -> RepositoryResult<FleetSnapshot> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let drivers = list_drivers_on(&tx)?;
        let routes = list_routes_on(&tx)?;
        let orders = list_orders_on(&tx)?;

        tx.commit()?;

        debug!(
            drivers = drivers.len(),
            routes = routes.len(),
            orders = orders.len(),
            "车队快照已读取"
        );
        Ok(FleetSnapshot::new(drivers, routes, orders))
    }
}
