// ==========================================
// 车队物流排班模拟系统 - 司机分配引擎
// ==========================================
// 职责: 把订单逐个分配给可用司机,推算完成时间
// 输入: 可用司机 + 订单 + 线路索引 + 发车时刻 + 工时上限
// 输出: 每个订单一条 Allocation (可能未分配)
// ==========================================
// 规则:
// 1) 订单按 (截止时间, order_id) 升序处理
// 2) 每位司机从发车时刻开始串行送单,不回程
// 3) 行驶耗时 = 基准耗时 / 速度系数
// 4) 剩余工时 = max(0, 上限 - 当班已工作) × 60, 不得透支
// 5) 在能容纳本单的司机中取最早空闲者,同时刻取 driver_id 最小者 (按字符串字典序)
// 6) 全员无法容纳则本单不分配 (不是错误)
// ==========================================

use crate::domain::fleet::{Driver, Order, Route};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::fatigue::FatigueModel;
use chrono::{Duration, NaiveDateTime};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// 分配原因：已分配给最早空闲的司机
pub const REASON_EARLIEST_FREE_DRIVER: &str = "EARLIEST_FREE_DRIVER";
/// 分配原因：没有任何可用司机
pub const REASON_NO_AVAILABLE_DRIVER: &str = "NO_AVAILABLE_DRIVER";
/// 分配原因：所有司机剩余工时都不足
pub const REASON_NO_DRIVER_CAPACITY: &str = "NO_DRIVER_CAPACITY";

/// 单订单分配结果
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub order_id: String,
    pub driver_id: Option<String>,
    pub completion_time: Option<NaiveDateTime>,
    pub traversal_minutes: Option<f64>,
    pub reason: &'static str,
}

impl Allocation {
    pub fn is_assigned(&self) -> bool {
        self.driver_id.is_some()
    }
}

/// 司机在本次模拟中的滚动状态
///
/// 时间轴与剩余工时统一按整数毫秒累计,与完成时间同一精度
#[derive(Debug, Clone)]
struct DriverSlot {
    driver_id: String,
    speed_factor: f64,
    next_free_ms: i64, // 距发车时刻的毫秒数
    remaining_ms: i64,
}

impl DriverSlot {
    fn traversal_minutes(&self, route: &Route) -> f64 {
        route.base_time_minutes / self.speed_factor
    }

    fn traversal_ms(&self, route: &Route) -> i64 {
        minutes_to_ms(self.traversal_minutes(route))
    }
}

// ==========================================
// Allocator - 司机分配引擎
// ==========================================
pub struct Allocator {
    fatigue: FatigueModel,
}

impl Allocator {
    pub fn new(fatigue: FatigueModel) -> Self {
        Self { fatigue }
    }

    /// 订单处理顺序：(截止时间, order_id) 升序
    pub fn processing_order(orders: &[Order]) -> Vec<&Order> {
        let mut sorted: Vec<&Order> = orders.iter().collect();
        sorted.sort_by(|a, b| {
            a.delivery_timestamp
                .cmp(&b.delivery_timestamp)
                .then_with(|| a.order_id.cmp(&b.order_id))
        });
        sorted
    }

    /// 分配全部订单
    ///
    /// # 参数
    /// - `drivers`: 本次可用司机（调用方已按 driver_id 截取）
    /// - `orders`: 全部订单
    /// - `routes`: route_id -> Route 索引
    /// - `start_at`: 发车时刻（模拟日 + HH:MM）
    /// - `max_hours_per_day`: 单司机工时上限
    ///
    /// # 返回
    /// 按处理顺序排列的分配结果; 引用未知线路时在任何分配之前失败
    #[instrument(skip(self, drivers, orders, routes), fields(
        drivers_count = drivers.len(),
        orders_count = orders.len(),
        start_at = %start_at,
        max_hours_per_day = max_hours_per_day
    ))]
    pub fn allocate(
        &self,
        drivers: &[Driver],
        orders: &[Order],
        routes: &HashMap<&str, &Route>,
        start_at: NaiveDateTime,
        max_hours_per_day: f64,
    ) -> EngineResult<Vec<Allocation>> {
        // 先整体校验线路引用,保证失败时没有部分结果
        for order in orders {
            if !routes.contains_key(order.assigned_route.as_str()) {
                return Err(EngineError::UnknownRoute {
                    order_id: order.order_id.clone(),
                    route_id: order.assigned_route.clone(),
                });
            }
        }

        let mut slots: Vec<DriverSlot> = drivers
            .iter()
            .map(|driver| DriverSlot {
                driver_id: driver.driver_id.clone(),
                speed_factor: self.fatigue.speed_factor(driver),
                next_free_ms: 0,
                remaining_ms: minutes_to_ms(((max_hours_per_day - driver.current_shift_hours) * 60.0).max(0.0)),
            })
            .collect();

        let mut allocations = Vec::with_capacity(orders.len());

        for order in Self::processing_order(orders) {
            let route = routes[order.assigned_route.as_str()];

            if slots.is_empty() {
                allocations.push(Self::unassigned(order, REASON_NO_AVAILABLE_DRIVER));
                continue;
            }

            let chosen = slots
                .iter()
                .enumerate()
                .filter(|(_, slot)| slot.remaining_ms >= slot.traversal_ms(route))
                .min_by(|(_, a), (_, b)| {
                    a.next_free_ms
                        .cmp(&b.next_free_ms)
                        .then_with(|| a.driver_id.cmp(&b.driver_id))
                })
                .map(|(idx, _)| idx);

            let Some(idx) = chosen else {
                debug!(order_id = %order.order_id, route_id = %route.route_id, "无司机剩余工时可容纳该订单");
                allocations.push(Self::unassigned(order, REASON_NO_DRIVER_CAPACITY));
                continue;
            };

            let slot = &mut slots[idx];
            let traversal = slot.traversal_minutes(route);
            let traversal_ms = slot.traversal_ms(route);
            slot.next_free_ms += traversal_ms;
            slot.remaining_ms -= traversal_ms;

            let completion_time = start_at + Duration::milliseconds(slot.next_free_ms);

            debug!(
                order_id = %order.order_id,
                driver_id = %slot.driver_id,
                traversal_minutes = traversal,
                completion_time = %completion_time,
                "订单已分配"
            );

            allocations.push(Allocation {
                order_id: order.order_id.clone(),
                driver_id: Some(slot.driver_id.clone()),
                completion_time: Some(completion_time),
                traversal_minutes: Some(traversal),
                reason: REASON_EARLIEST_FREE_DRIVER,
            });
        }

        Ok(allocations)
    }

    fn unassigned(order: &Order, reason: &'static str) -> Allocation {
        Allocation {
            order_id: order.order_id.clone(),
            driver_id: None,
            completion_time: None,
            traversal_minutes: None,
            reason,
        }
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new(FatigueModel::default())
    }
}

/// 分钟数 -> 整数毫秒（四舍五入）
fn minutes_to_ms(minutes: f64) -> i64 {
    (minutes * 60_000.0).round() as i64
}
