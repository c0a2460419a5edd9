// ==========================================
// 车队物流排班模拟系统 - 线路仓储
// ==========================================
// 红线: 被订单引用的线路不可删除 (外键 RESTRICT)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::fleet::Route;
use crate::domain::types::TrafficLevel;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str =
    "SELECT route_id, distance_km, traffic_level, base_time_minutes FROM route";

pub(crate) fn map_route_row(row: &Row<'_>) -> rusqlite::Result<Route> {
    let raw_level: String = row.get(2)?;
    let traffic_level = TrafficLevel::parse(&raw_level).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Text,
            format!("非法路况: {}", raw_level).into(),
        )
    })?;

    Ok(Route {
        route_id: row.get(0)?,
        distance_km: row.get(1)?,
        traffic_level,
        base_time_minutes: row.get(3)?,
    })
}

pub(crate) fn list_routes_on(conn: &Connection) -> RepositoryResult<Vec<Route>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY route_id", SELECT_COLUMNS))?;
    let routes = stmt
        .query_map([], map_route_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(routes)
}

pub(crate) fn insert_route_on(conn: &Connection, route: &Route) -> RepositoryResult<()> {
    conn.execute(
        r#"
        INSERT INTO route (route_id, distance_km, traffic_level, base_time_minutes)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![
            route.route_id,
            route.distance_km,
            route.traffic_level.to_db_str(),
            route.base_time_minutes,
        ],
    )?;
    Ok(())
}

// ==========================================
// RouteRepository - 线路仓储
// ==========================================
pub struct RouteRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RouteRepository {
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

    pub fn insert(&self, route: &Route) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        insert_route_on(&conn, route)
    }

    pub fn update(&self, route: &Route) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE route
            SET distance_km = ?2, traffic_level = ?3, base_time_minutes = ?4,
                updated_at = datetime('now')
            WHERE route_id = ?1
            "#,
            params![
                route.route_id,
                route.distance_km,
                route.traffic_level.to_db_str(),
                route.base_time_minutes,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Route".to_string(),
                id: route.route_id.clone(),
            });
        }
        Ok(())
    }

    /// 删除线路
    ///
    /// 仍被订单引用时返回 BusinessRuleViolation
    pub fn delete(&self, route_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let referenced: i64 = conn.query_row(
            "SELECT COUNT(*) FROM delivery_order WHERE route_id = ?1",
            params![route_id],
            |row| row.get(0),
        )?;
        if referenced > 0 {
            return Err(RepositoryError::BusinessRuleViolation(format!(
                "线路 {} 仍被 {} 个订单引用",
                route_id, referenced
            )));
        }

        let affected = conn.execute("DELETE FROM route WHERE route_id = ?1", params![route_id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Route".to_string(),
                id: route_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn find_by_id(&self, route_id: &str) -> RepositoryResult<Option<Route>> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            &format!("{} WHERE route_id = ?1", SELECT_COLUMNS),
            params![route_id],
            map_route_row,
        );

        match result {
            Ok(route) => Ok(Some(route)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn exists(&self, route_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM route WHERE route_id = ?1",
            params![route_id],
            |row| row.get(0),
        )?;
        Ok(n > 0)
    }

    /// 全部线路（按 route_id 升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Route>> {
        let conn = self.get_conn()?;
        list_routes_on(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn setup() -> (Arc<Mutex<Connection>>, RouteRepository) {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        (conn.clone(), RouteRepository::from_connection(conn))
    }

    fn route(id: &str, level: TrafficLevel) -> Route {
        Route {
            route_id: id.to_string(),
            distance_km: 12.0,
            traffic_level: level,
            base_time_minutes: 35.0,
        }
    }

    #[test]
    fn test_insert_update_find() {
        let (_conn, repo) = setup();
        repo.insert(&route("R1", TrafficLevel::Low)).unwrap();
        repo.update(&route("R1", TrafficLevel::High)).unwrap();

        let found = repo.find_by_id("R1").unwrap().unwrap();
        assert_eq!(found.traffic_level, TrafficLevel::High);
        assert!(repo.exists("R1").unwrap());
        assert!(!repo.exists("R2").unwrap());
    }

    #[test]
    fn test_delete_referenced_route_rejected() {
        let (conn, repo) = setup();
        repo.insert(&route("R1", TrafficLevel::Medium)).unwrap();
        conn.lock()
            .unwrap()
            .execute(
                "INSERT INTO delivery_order (order_id, value_rs, route_id, delivery_ts)
                 VALUES ('O1', 100.0, 'R1', '2025-01-01 10:00:00')",
                [],
            )
            .unwrap();

        let err = repo.delete("R1").unwrap_err();
        assert!(matches!(err, RepositoryError::BusinessRuleViolation(_)));
        assert!(repo.exists("R1").unwrap());
    }

    #[test]
    fn test_invalid_traffic_level_in_db_is_reported() {
        let (conn, repo) = setup();
        // 直接验证映射函数
        let c = conn.lock().unwrap();
        let err = c
            .query_row("SELECT 'R1', 1.0, 'Jammed', 10.0", [], map_route_row)
            .unwrap_err();
        assert!(matches!(err, rusqlite::Error::FromSqlConversionFailure(..)));
        drop(c);
        assert!(repo.list_all().unwrap().is_empty());
    }
}
