// ==========================================
// 车队物流排班模拟系统 - 司机仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::fleet::Driver;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str =
    "SELECT driver_id, name, current_shift_hours, past_7_day_work_hours FROM driver";

/// 行映射（快照读取复用）
pub(crate) fn map_driver_row(row: &Row<'_>) -> rusqlite::Result<Driver> {
    Ok(Driver {
        driver_id: row.get(0)?,
        name: row.get(1)?,
        current_shift_hours: row.get(2)?,
        past_7_day_work_hours: row.get(3)?,
    })
}

/// 在给定连接/事务上读取全部司机（按 driver_id 升序）
pub(crate) fn list_drivers_on(conn: &Connection) -> RepositoryResult<Vec<Driver>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY driver_id", SELECT_COLUMNS))?;
    let drivers = stmt
        .query_map([], map_driver_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(drivers)
}

/// 在给定连接/事务上插入司机
pub(crate) fn insert_driver_on(conn: &Connection, driver: &Driver) -> RepositoryResult<()> {
    conn.execute(
        r#"
        INSERT INTO driver (driver_id, name, current_shift_hours, past_7_day_work_hours)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![
            driver.driver_id,
            driver.name,
            driver.current_shift_hours,
            driver.past_7_day_work_hours,
        ],
    )?;
    Ok(())
}

// ==========================================
// DriverRepository - 司机仓储
// ==========================================
pub struct DriverRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DriverRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增司机（driver_id 重复时返回 UniqueConstraintViolation）
    pub fn insert(&self, driver: &Driver) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        insert_driver_on(&conn, driver)
    }

    /// 更新司机
    pub fn update(&self, driver: &Driver) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE driver
            SET name = ?2, current_shift_hours = ?3, past_7_day_work_hours = ?4,
                updated_at = datetime('now')
            WHERE driver_id = ?1
            "#,
            params![
                driver.driver_id,
                driver.name,
                driver.current_shift_hours,
                driver.past_7_day_work_hours,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Driver".to_string(),
                id: driver.driver_id.clone(),
            });
        }
        Ok(())
    }

    /// 删除司机
    pub fn delete(&self, driver_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM driver WHERE driver_id = ?1", params![driver_id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Driver".to_string(),
                id: driver_id.to_string(),
            });
        }
        Ok(())
    }

    /// 按 driver_id 查询
    pub fn find_by_id(&self, driver_id: &str) -> RepositoryResult<Option<Driver>> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            &format!("{} WHERE driver_id = ?1", SELECT_COLUMNS),
            params![driver_id],
            map_driver_row,
        );

        match result {
            Ok(driver) => Ok(Some(driver)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 全部司机（按 driver_id 升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Driver>> {
        let conn = self.get_conn()?;
        list_drivers_on(&conn)
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM driver", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}
