// ==========================================
// 车队物流排班模拟系统 - 模拟引擎编排器
// ==========================================
// 流程: 校验 -> 选司机 -> 分配 -> 逐单评估 -> KPI 汇总
// 红线: 纯计算; 不读时钟、不读写数据库、不修改快照
// 记录(RunRecorder)由调用方在成功后执行
// ==========================================

use crate::config::SimulationParameters;
use crate::domain::fleet::{Driver, FleetSnapshot, Route};
use crate::domain::simulation::{parse_start_time, KpiSummary, PerOrderResult, SimulationInput};
use crate::engine::allocator::Allocator;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::evaluator::OutcomeEvaluator;
use crate::engine::fatigue::FatigueModel;
use crate::engine::kpi::KpiAggregator;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument, warn};

/// 工时上限允许范围（小时）
pub const MIN_HOURS_PER_DAY: f64 = 1.0;
pub const MAX_HOURS_PER_DAY: f64 = 24.0;

// ==========================================
// SimulationOutcome - 单次模拟结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub plan_date: Option<NaiveDate>, // 无订单且未指定日期时为 None
    pub order_results: Vec<PerOrderResult>,
    pub summary: KpiSummary,
}

// ==========================================
// SimulationEngine - 模拟引擎
// ==========================================
pub struct SimulationEngine {
    params: SimulationParameters,
    allocator: Allocator,
    evaluator: OutcomeEvaluator,
    aggregator: KpiAggregator,
}

impl SimulationEngine {
    /// 创建引擎实例（参数在一次运行内不变）
    pub fn new(params: SimulationParameters) -> Self {
        Self {
            allocator: Allocator::new(FatigueModel::from_parameters(&params)),
            evaluator: OutcomeEvaluator::from_parameters(&params),
            aggregator: KpiAggregator::new(),
            params,
        }
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.params
    }

    /// 执行一次模拟
    ///
    /// # 返回
    /// - Ok(SimulationOutcome): 每个订单一条结果 + KPI 汇总
    /// - Err(EngineError): 输入非法或引用未知线路; 无任何部分结果
    #[instrument(skip(self, snapshot, input), fields(
        available_drivers = input.available_drivers,
        start_time = %input.start_time,
        max_hours_per_day = input.max_hours_per_day,
        drivers_total = snapshot.drivers.len(),
        orders_total = snapshot.orders.len()
    ))]
    pub fn run(&self, snapshot: &FleetSnapshot, input: &SimulationInput) -> EngineResult<SimulationOutcome> {
        info!("开始执行模拟");

        self.params.validate().map_err(EngineError::Validation)?;
        let start_time = Self::validate_input(snapshot, input)?;
        Self::validate_snapshot(snapshot)?;

        let route_index: HashMap<&str, &Route> = snapshot
            .routes
            .iter()
            .map(|r| (r.route_id.as_str(), r))
            .collect();

        // ===== Step 1: 选出可用司机（按 driver_id 取前 n 位）=====
        let pool = Self::select_driver_pool(&snapshot.drivers, input.available_drivers);
        debug!(pool = ?pool.iter().map(|d| d.driver_id.as_str()).collect::<Vec<_>>(), "可用司机");

        // ===== Step 2: 确定模拟日期 =====
        let plan_date = input.plan_date.or_else(|| {
            snapshot
                .orders
                .iter()
                .map(|o| o.delivery_timestamp)
                .min()
                .map(|ts| ts.date())
        });

        let Some(plan_date) = plan_date else {
            info!("无订单,返回空汇总");
            return Ok(SimulationOutcome {
                plan_date: None,
                order_results: Vec::new(),
                summary: self.aggregator.aggregate(&[]),
            });
        };
        let start_at = plan_date.and_time(start_time);

        // ===== Step 3: 分配 =====
        let allocations = self.allocator.allocate(
            &pool,
            &snapshot.orders,
            &route_index,
            start_at,
            input.max_hours_per_day,
        )?;

        // ===== Step 4: 逐单评估 =====
        let order_index: HashMap<&str, _> = snapshot
            .orders
            .iter()
            .map(|o| (o.order_id.as_str(), o))
            .collect();

        let mut order_results = Vec::with_capacity(allocations.len());
        for allocation in &allocations {
            let order = order_index[allocation.order_id.as_str()];
            let route = route_index[order.assigned_route.as_str()];
            if !allocation.is_assigned() {
                warn!(
                    order_id = %order.order_id,
                    reason = allocation.reason,
                    "订单无法分配,按迟到计罚"
                );
            }
            order_results.push(self.evaluator.evaluate(order, route, allocation));
        }

        // ===== Step 5: KPI 汇总 =====
        let summary = self.aggregator.aggregate(&order_results);

        info!(
            plan_date = %plan_date,
            total_deliveries = summary.total_deliveries,
            on_time_deliveries = summary.on_time_deliveries,
            total_profit = summary.total_profit,
            efficiency_score = summary.efficiency_score,
            "模拟完成"
        );

        Ok(SimulationOutcome {
            plan_date: Some(plan_date),
            order_results,
            summary,
        })
    }

    /// 取 driver_id 升序的前 n 位司机
    ///
    /// 按字符串字典序比较: "D10" 排在 "D2" 之前, 建议使用定长编号 (如 D001)
    pub fn select_driver_pool(drivers: &[Driver], available: usize) -> Vec<Driver> {
        let mut sorted: Vec<Driver> = drivers.to_vec();
        sorted.sort_by(|a, b| a.driver_id.cmp(&b.driver_id));
        sorted.truncate(available);
        sorted
    }

    // ==========================================
    // 不变量防御
    // ==========================================

    fn validate_input(snapshot: &FleetSnapshot, input: &SimulationInput) -> EngineResult<chrono::NaiveTime> {
        if input.available_drivers > snapshot.drivers.len() {
            return Err(EngineError::Validation(format!(
                "availableDrivers={} 超过司机总数 {}",
                input.available_drivers,
                snapshot.drivers.len()
            )));
        }
        if !(input.max_hours_per_day >= MIN_HOURS_PER_DAY && input.max_hours_per_day <= MAX_HOURS_PER_DAY) {
            return Err(EngineError::Validation(format!(
                "maxHoursPerDay 必须在 [{}, {}] 内，实际 {}",
                MIN_HOURS_PER_DAY, MAX_HOURS_PER_DAY, input.max_hours_per_day
            )));
        }
        parse_start_time(&input.start_time).ok_or_else(|| {
            EngineError::Validation(format!("startTime 必须为 HH:MM 格式，实际 '{}'", input.start_time))
        })
    }

    fn validate_snapshot(snapshot: &FleetSnapshot) -> EngineResult<()> {
        for driver in &snapshot.drivers {
            if !(driver.current_shift_hours >= 0.0) {
                return Err(EngineError::Validation(format!(
                    "司机 {} 当班工时不能为负",
                    driver.driver_id
                )));
            }
        }

        for route in &snapshot.routes {
            if !(route.distance_km > 0.0) || !(route.base_time_minutes > 0.0) {
                return Err(EngineError::Validation(format!(
                    "线路 {} 的距离与基准耗时必须大于0",
                    route.route_id
                )));
            }
        }

        let mut seen = HashSet::new();
        for order in &snapshot.orders {
            if !(order.value_rs > 0.0) {
                return Err(EngineError::Validation(format!(
                    "订单 {} 货值必须大于0",
                    order.order_id
                )));
            }
            if !seen.insert(order.order_id.as_str()) {
                return Err(EngineError::Validation(format!(
                    "订单ID重复: {}",
                    order.order_id
                )));
            }
        }

        Ok(())
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(SimulationParameters::default())
    }
}
