// ==========================================
// 车队物流排班模拟系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键、busy_timeout）
// - 统一建表入口，测试与正式运行共用同一份 schema
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema（幂等）
///
/// 说明：
/// - simulation_run 只允许追加，UPDATE/DELETE 由触发器拦截
/// - delivery_order.route_id 外键保证被引用线路不可删除
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    configure_sqlite_connection(conn)?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS driver (
            driver_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            current_shift_hours REAL NOT NULL CHECK (current_shift_hours >= 0),
            past_7_day_work_hours REAL NOT NULL
                CHECK (past_7_day_work_hours >= 0 AND past_7_day_work_hours <= 168),
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS route (
            route_id TEXT PRIMARY KEY,
            distance_km REAL NOT NULL CHECK (distance_km > 0),
            traffic_level TEXT NOT NULL CHECK (traffic_level IN ('Low', 'Medium', 'High')),
            base_time_minutes REAL NOT NULL CHECK (base_time_minutes > 0),
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS delivery_order (
            order_id TEXT PRIMARY KEY,
            value_rs REAL NOT NULL CHECK (value_rs > 0),
            route_id TEXT NOT NULL REFERENCES route(route_id) ON DELETE RESTRICT,
            delivery_ts TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_order_route ON delivery_order(route_id);

        CREATE TABLE IF NOT EXISTS simulation_run (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            run_id TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            inputs_json TEXT NOT NULL,
            summary_json TEXT NOT NULL,
            order_results_json TEXT NOT NULL
        );

        CREATE TRIGGER IF NOT EXISTS trg_simulation_run_no_update
        BEFORE UPDATE ON simulation_run
        BEGIN
            SELECT RAISE(ABORT, 'simulation_run is append-only');
        END;

        CREATE TRIGGER IF NOT EXISTS trg_simulation_run_no_delete
        BEFORE DELETE ON simulation_run
        BEGIN
            SELECT RAISE(ABORT, 'simulation_run is append-only');
        END;
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_schema_version_absent_on_empty_db() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);
    }

    #[test]
    fn test_simulation_run_rejects_update_and_delete() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO simulation_run (run_id, created_at, inputs_json, summary_json, order_results_json)
             VALUES ('r1', '2025-01-01 09:00:00', '{}', '{}', '[]')",
            [],
        )
        .unwrap();

        assert!(conn
            .execute("UPDATE simulation_run SET summary_json = '{\"x\":1}' WHERE run_id = 'r1'", [])
            .is_err());
        assert!(conn.execute("DELETE FROM simulation_run WHERE run_id = 'r1'", []).is_err());
    }
}
