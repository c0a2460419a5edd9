// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use fleet_logistics_sim::app::AppState;
use fleet_logistics_sim::db::{init_schema, open_sqlite_connection};
use fleet_logistics_sim::domain::{Driver, Order, Route, TrafficLevel};
use rusqlite::Connection;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_string_lossy().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开共享连接（与 AppState 相同的 PRAGMA）
pub fn open_shared_conn(db_path: &str) -> Result<Arc<Mutex<Connection>>, Box<dyn Error>> {
    let conn = open_sqlite_connection(db_path)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// 创建基于临时数据库的 AppState
pub fn create_test_state() -> Result<(NamedTempFile, AppState), Box<dyn Error>> {
    let (temp_file, db_path) = create_test_db()?;
    let state = AppState::new(db_path)?;
    Ok((temp_file, state))
}

// ==========================================
// 测试数据构造
// ==========================================

pub fn plan_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

pub fn at(h: u32, m: u32) -> NaiveDateTime {
    plan_date().and_hms_opt(h, m, 0).unwrap()
}

pub fn driver(id: &str, shift_hours: f64) -> Driver {
    Driver {
        driver_id: id.to_string(),
        name: format!("司机{}", id),
        current_shift_hours: shift_hours,
        past_7_day_work_hours: 40.0,
    }
}

pub fn route(id: &str, distance_km: f64, level: TrafficLevel, base_time_minutes: f64) -> Route {
    Route {
        route_id: id.to_string(),
        distance_km,
        traffic_level: level,
        base_time_minutes,
    }
}

pub fn order(id: &str, value_rs: f64, route_id: &str, deadline: NaiveDateTime) -> Order {
    Order {
        order_id: id.to_string(),
        value_rs,
        assigned_route: route_id.to_string(),
        delivery_timestamp: deadline,
    }
}

/// 写入一组样例车队数据
///
/// 3 名司机（D3 已疲劳）、3 条线路（三档路况）、6 个订单
pub fn seed_sample_fleet(state: &AppState) -> Result<(), Box<dyn Error>> {
    let api = &state.fleet_api;

    api.create_driver(driver("D1", 0.0))?;
    api.create_driver(driver("D2", 4.0))?;
    api.create_driver(driver("D3", 9.0))?;

    api.create_route(route("R1", 10.0, TrafficLevel::Low, 30.0))?;
    api.create_route(route("R2", 25.0, TrafficLevel::Medium, 60.0))?;
    api.create_route(route("R3", 12.0, TrafficLevel::High, 45.0))?;

    api.create_order(order("O1", 1500.0, "R1", at(10, 0)))?;
    api.create_order(order("O2", 800.0, "R2", at(10, 30)))?;
    api.create_order(order("O3", 2200.0, "R3", at(9, 50)))?;
    api.create_order(order("O4", 450.0, "R1", at(11, 0)))?;
    api.create_order(order("O5", 3000.0, "R2", at(9, 30)))?;
    api.create_order(order("O6", 1200.0, "R3", at(12, 0)))?;

    Ok(())
}

/// 写入 CSV 文件（导入测试用）
pub fn write_csv(dir: &std::path::Path, name: &str, content: &str) -> Result<(), Box<dyn Error>> {
    std::fs::write(dir.join(name), content)?;
    Ok(())
}
