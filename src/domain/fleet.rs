// ==========================================
// 车队物流排班模拟系统 - 车队实体领域模型
// ==========================================
// 职责: 司机 / 线路 / 订单 三类主实体
// 红线: 模拟运行期间只读,引擎不回写实体
// ==========================================

use crate::domain::types::{OrderPriority, RouteEfficiency, TrafficLevel};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Driver - 司机
// ==========================================
// 两个工时计数器相互独立 (不校验 current <= past_7_day)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub driver_id: String,           // 司机ID (唯一)
    pub name: String,                // 姓名
    pub current_shift_hours: f64,    // 当日已工作小时 (>=0)
    pub past_7_day_work_hours: f64,  // 近7日累计工时 (0~168)
}

// ==========================================
// Route - 线路
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub route_id: String,            // 线路ID (唯一)
    pub distance_km: f64,            // 距离 (>0)
    pub traffic_level: TrafficLevel, // 路况
    pub base_time_minutes: f64,      // 正常路况下基准耗时 (>0)
}

impl Route {
    /// 每公里基准耗时（分钟）
    pub fn minutes_per_km(&self) -> f64 {
        self.base_time_minutes / self.distance_km
    }

    /// 线路效率分级（展示用）
    pub fn efficiency(&self) -> RouteEfficiency {
        RouteEfficiency::from_minutes_per_km(self.minutes_per_km())
    }
}

// ==========================================
// Order - 订单
// ==========================================
// 一个订单只引用一条线路; 一条线路可服务多个订单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,                  // 订单ID (唯一)
    pub value_rs: f64,                     // 货值 (>0)
    pub assigned_route: String,            // 外键: Route.route_id
    pub delivery_timestamp: NaiveDateTime, // 截止送达时间
}

impl Order {
    /// 订单优先级（展示用）
    pub fn priority(&self) -> OrderPriority {
        OrderPriority::from_value(self.value_rs)
    }
}

// ==========================================
// FleetSnapshot - 一次模拟的输入快照
// ==========================================
// 在运行开始时一次性读取,运行中不再重读
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSnapshot {
    pub drivers: Vec<Driver>,
    pub routes: Vec<Route>,
    pub orders: Vec<Order>,
}

impl FleetSnapshot {
    pub fn new(drivers: Vec<Driver>, routes: Vec<Route>, orders: Vec<Order>) -> Self {
        Self {
            drivers,
            routes,
            orders,
        }
    }
}

// ==========================================
// 管理页汇总
// ==========================================

/// 司机汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverSummary {
    pub total: usize,
    pub fit: usize,      // 未疲劳
    pub fatigued: usize, // 疲劳
    pub average_shift_hours: f64,
}

/// 订单汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub total: usize,
    pub total_value: f64,
    pub high_value_orders: usize, // 货值超过奖励门槛的订单数
    pub average_value: f64,
}
