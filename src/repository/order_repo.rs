// ==========================================
// 车队物流排班模拟系统 - 订单仓储
// ==========================================
// 存储: delivery_order 表; 截止时间以 "%Y-%m-%d %H:%M:%S" 文本存储
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::fleet::Order;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

/// 数据库时间文本格式
pub const DB_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SELECT_COLUMNS: &str =
    "SELECT order_id, value_rs, route_id, delivery_ts FROM delivery_order";

pub(crate) fn map_order_row(row: &Row<'_>) -> rusqlite::Result<Order> {
    let raw_ts: String = row.get(3)?;
    let delivery_timestamp = NaiveDateTime::parse_from_str(&raw_ts, DB_DATETIME_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(Order {
        order_id: row.get(0)?,
        value_rs: row.get(1)?,
        assigned_route: row.get(2)?,
        delivery_timestamp,
    })
}

pub(crate) fn list_orders_on(conn: &Connection) -> RepositoryResult<Vec<Order>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY order_id", SELECT_COLUMNS))?;
    let orders = stmt
        .query_map([], map_order_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(orders)
}

pub(crate) fn insert_order_on(conn: &Connection, order: &Order) -> RepositoryResult<()> {
    conn.execute(
        r#"
        INSERT INTO delivery_order (order_id, value_rs, route_id, delivery_ts)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![
            order.order_id,
            order.value_rs,
            order.assigned_route,
            order.delivery_timestamp.format(DB_DATETIME_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

// ==========================================
// OrderRepository - 订单仓储
// ==========================================
pub struct OrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OrderRepository {
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

    /// 新增订单（线路不存在时返回 ForeignKeyViolation）
    pub fn insert(&self, order: &Order) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        insert_order_on(&conn, order)
    }

    pub fn update(&self, order: &Order) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE delivery_order
            SET value_rs = ?2, route_id = ?3, delivery_ts = ?4, updated_at = datetime('now')
            WHERE order_id = ?1
            "#,
            params![
                order.order_id,
                order.value_rs,
                order.assigned_route,
                order.delivery_timestamp.format(DB_DATETIME_FORMAT).to_string(),
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Order".to_string(),
                id: order.order_id.clone(),
            });
        }
        Ok(())
    }

    pub fn delete(&self, order_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM delivery_order WHERE order_id = ?1",
            params![order_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Order".to_string(),
                id: order_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn find_by_id(&self, order_id: &str) -> RepositoryResult<Option<Order>> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            &format!("{} WHERE order_id = ?1", SELECT_COLUMNS),
            params![order_id],
            map_order_row,
        );

        match result {
            Ok(order) => Ok(Some(order)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 全部订单（按 order_id 升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Order>> {
        let conn = self.get_conn()?;
        list_orders_on(&conn)
    }

    /// 某线路下的订单
    pub fn list_by_route(&self, route_id: &str) -> RepositoryResult<Vec<Order>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE route_id = ?1 ORDER BY delivery_ts, order_id",
            SELECT_COLUMNS
        ))?;
        let orders = stmt
            .query_map(params![route_id], map_order_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(orders)
    }
}
