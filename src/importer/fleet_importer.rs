// ==========================================
// 车队物流排班模拟系统 - 车队样例数据导入
// ==========================================
// 输入目录:
// - drivers.csv: name,shift_hours,past_week_hours   (past_week_hours 可为 "|" 分隔的每日工时,求和)
// - routes.csv:  route_id,distance_km,traffic_level,base_time_min
// - orders.csv:  order_id,value_rs,route_id,delivery_time
// 红线: 整体替换三张实体表,单事务; 任一行失败则全部不落库
// ==========================================

use crate::domain::fleet::{Driver, Order, Route};
use crate::domain::simulation::parse_start_time;
use crate::domain::types::TrafficLevel;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{CsvParser, RawRecord};
use crate::repository::driver_repo::insert_driver_on;
use crate::repository::error::RepositoryError;
use crate::repository::order_repo::insert_order_on;
use crate::repository::route_repo::insert_route_on;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument};

pub const DRIVERS_FILE: &str = "drivers.csv";
pub const ROUTES_FILE: &str = "routes.csv";
pub const ORDERS_FILE: &str = "orders.csv";

/// 单日工时上限 / 近7日工时上限
const MAX_SHIFT_HOURS: f64 = 24.0;
const MAX_WEEK_HOURS: f64 = 168.0;

/// 导入结果统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub drivers: usize,
    pub routes: usize,
    pub orders: usize,
}

// ==========================================
// FleetCsvImporter - 车队 CSV 导入器
// ==========================================
pub struct FleetCsvImporter {
    conn: Arc<Mutex<Connection>>,
}

impl FleetCsvImporter {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从目录导入三份 CSV 并整体替换实体表
    ///
    /// # 参数
    /// - dir: 含 drivers.csv / routes.csv / orders.csv 的目录
    /// - reference_date: 订单截止时间仅为 HH:MM 时使用的日期
    #[instrument(skip(self, dir), fields(dir = %dir.display(), reference_date = %reference_date))]
    pub fn import_dir(&self, dir: &Path, reference_date: NaiveDate) -> ImportResult<ImportSummary> {
        let drivers = parse_drivers(&CsvParser::parse_to_raw_records(
            &dir.join(DRIVERS_FILE),
            &["name", "shift_hours", "past_week_hours"],
        )?)?;
        let routes = parse_routes(&CsvParser::parse_to_raw_records(
            &dir.join(ROUTES_FILE),
            &["route_id", "distance_km", "traffic_level", "base_time_min"],
        )?)?;
        let orders = parse_orders(
            &CsvParser::parse_to_raw_records(
                &dir.join(ORDERS_FILE),
                &["order_id", "value_rs", "route_id", "delivery_time"],
            )?,
            &routes,
            reference_date,
        )?;

        self.replace_all(&drivers, &routes, &orders)?;

        let summary = ImportSummary {
            drivers: drivers.len(),
            routes: routes.len(),
            orders: orders.len(),
        };
        info!(
            drivers = summary.drivers,
            routes = summary.routes,
            orders = summary.orders,
            "样例数据导入完成"
        );
        Ok(summary)
    }

    /// 单事务整体替换
    pub fn replace_all(&self, drivers: &[Driver], routes: &[Route], orders: &[Order]) -> ImportResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let tx = conn.unchecked_transaction()?;

        tx.execute_batch(
            r#"
            DELETE FROM delivery_order;
            DELETE FROM route;
            DELETE FROM driver;
            "#,
        )?;

        for driver in drivers {
            insert_driver_on(&tx, driver)?;
        }
        for route in routes {
            insert_route_on(&tx, route)?;
        }
        for order in orders {
            insert_order_on(&tx, order)?;
        }

        tx.commit()?;
        Ok(())
    }
}

// ==========================================
// 行解析
// ==========================================

fn parse_f64(record: &RawRecord, field: &str) -> ImportResult<f64> {
    let raw = record.get(field);
    raw.parse::<f64>().map_err(|e| ImportError::TypeConversionError {
        row: record.row,
        field: field.to_string(),
        message: format!("'{}': {}", raw, e),
    })
}

fn check_range(record: &RawRecord, field: &str, value: f64, min: f64, max: f64) -> ImportResult<f64> {
    if !(value >= min && value <= max) {
        return Err(ImportError::ValueRangeError {
            row: record.row,
            field: field.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(value)
}

fn check_positive(record: &RawRecord, field: &str, value: f64) -> ImportResult<f64> {
    if !(value > 0.0) {
        return Err(ImportError::ValueRangeError {
            row: record.row,
            field: field.to_string(),
            value,
            min: f64::MIN_POSITIVE,
            max: f64::MAX,
        });
    }
    Ok(value)
}

fn required_key(record: &RawRecord, field: &str) -> ImportResult<String> {
    let value = record.get(field);
    if value.is_empty() {
        return Err(ImportError::PrimaryKeyMissing {
            row: record.row,
            field: field.to_string(),
        });
    }
    Ok(value.to_string())
}

/// 近7日工时: 单值或 "|" 分隔的每日工时
fn parse_week_hours(record: &RawRecord) -> ImportResult<f64> {
    let raw = record.get("past_week_hours");
    let mut total = 0.0;
    for part in raw.split('|') {
        let part = part.trim();
        let hours = part.parse::<f64>().map_err(|e| ImportError::TypeConversionError {
            row: record.row,
            field: "past_week_hours".to_string(),
            message: format!("'{}': {}", part, e),
        })?;
        total += hours;
    }
    Ok(total)
}

/// 司机文件无ID列,按行序生成 D001, D002 ...
pub fn parse_drivers(records: &[RawRecord]) -> ImportResult<Vec<Driver>> {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let name = required_key(record, "name")?;
            let shift = parse_f64(record, "shift_hours")?;
            let week = parse_week_hours(record)?;

            Ok(Driver {
                driver_id: format!("D{:03}", idx + 1),
                name,
                current_shift_hours: check_range(record, "shift_hours", shift, 0.0, MAX_SHIFT_HOURS)?,
                past_7_day_work_hours: check_range(record, "past_week_hours", week, 0.0, MAX_WEEK_HOURS)?,
            })
        })
        .collect()
}

pub fn parse_routes(records: &[RawRecord]) -> ImportResult<Vec<Route>> {
    let mut seen = HashSet::new();
    let mut routes = Vec::with_capacity(records.len());

    for record in records {
        let route_id = required_key(record, "route_id")?;
        if !seen.insert(route_id.clone()) {
            return Err(ImportError::DuplicateKey {
                row: record.row,
                key: route_id,
            });
        }

        let raw_level = record.get("traffic_level");
        let traffic_level = TrafficLevel::parse(raw_level).ok_or_else(|| ImportError::TypeConversionError {
            row: record.row,
            field: "traffic_level".to_string(),
            message: format!("'{}' 不是 Low/Medium/High", raw_level),
        })?;

        let distance = parse_f64(record, "distance_km")?;
        let base_time = parse_f64(record, "base_time_min")?;

        routes.push(Route {
            route_id,
            distance_km: check_positive(record, "distance_km", distance)?,
            traffic_level,
            base_time_minutes: check_positive(record, "base_time_min", base_time)?,
        });
    }

    Ok(routes)
}

/// 截止时间: "YYYY-MM-DD HH:MM[:SS]" 或 "HH:MM"（与参考日期组合）
pub fn parse_delivery_time(raw: &str, reference_date: NaiveDate) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M"))
        .ok()
        .or_else(|| parse_start_time(raw).map(|t| reference_date.and_time(t)))
}

pub fn parse_orders(
    records: &[RawRecord],
    routes: &[Route],
    reference_date: NaiveDate,
) -> ImportResult<Vec<Order>> {
    let known_routes: HashSet<&str> = routes.iter().map(|r| r.route_id.as_str()).collect();
    let mut seen = HashSet::new();
    let mut orders = Vec::with_capacity(records.len());

    for record in records {
        let order_id = required_key(record, "order_id")?;
        if !seen.insert(order_id.clone()) {
            return Err(ImportError::DuplicateKey {
                row: record.row,
                key: order_id,
            });
        }

        let route_id = required_key(record, "route_id")?;
        if !known_routes.contains(route_id.as_str()) {
            return Err(ImportError::UnknownRoute {
                row: record.row,
                route_id,
            });
        }

        let value = parse_f64(record, "value_rs")?;
        let raw_time = record.get("delivery_time");
        let delivery_timestamp =
            parse_delivery_time(raw_time, reference_date).ok_or_else(|| ImportError::DateFormatError {
                row: record.row,
                field: "delivery_time".to_string(),
                value: raw_time.to_string(),
            })?;

        orders.push(Order {
            order_id,
            value_rs: check_positive(record, "value_rs", value)?,
            assigned_route: route_id,
            delivery_timestamp,
        });
    }

    Ok(orders)
}
