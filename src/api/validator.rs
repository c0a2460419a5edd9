// ==========================================
// 车队物流排班模拟系统 - 请求校验器
// ==========================================
// 职责: 在调用引擎/仓储之前校验调用方输入
// - 模拟请求: 1 <= availableDrivers <= 司机总数; 1 <= maxHoursPerDay <= 24; startTime 为 HH:MM
// - 实体表单: 司机/线路/订单的字段约束
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::fleet::{Driver, Order, Route};
use crate::domain::simulation::{parse_start_time, SimulationInput};
use crate::engine::orchestrator::{MAX_HOURS_PER_DAY, MIN_HOURS_PER_DAY};
use serde::{Deserialize, Serialize};

/// 近7日工时上限
pub const MAX_PAST_WEEK_HOURS: f64 = 168.0;

/// 单条字段违规
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

impl FieldViolation {
    fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// 违规列表 -> ApiError（空列表视为通过）
fn into_result(violations: Vec<FieldViolation>) -> ApiResult<()> {
    if violations.is_empty() {
        return Ok(());
    }
    let message = violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.reason))
        .collect::<Vec<_>>()
        .join("; ");
    Err(ApiError::ValidationError(message))
}

// ==========================================
// SimulationRequestValidator - 模拟请求校验
// ==========================================
pub struct SimulationRequestValidator;

impl SimulationRequestValidator {
    /// 校验模拟请求
    ///
    /// # 参数
    /// - input: 模拟输入
    /// - driver_count: 当前司机总数
    pub fn validate(input: &SimulationInput, driver_count: usize) -> ApiResult<()> {
        into_result(Self::collect_violations(input, driver_count))
    }

    pub fn collect_violations(input: &SimulationInput, driver_count: usize) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if input.available_drivers < 1 || input.available_drivers > driver_count {
            violations.push(FieldViolation::new(
                "availableDrivers",
                format!("必须在 1 到 {} 之间，实际 {}", driver_count, input.available_drivers),
            ));
        }

        if !(input.max_hours_per_day >= MIN_HOURS_PER_DAY && input.max_hours_per_day <= MAX_HOURS_PER_DAY) {
            violations.push(FieldViolation::new(
                "maxHoursPerDay",
                format!(
                    "必须在 {} 到 {} 之间，实际 {}",
                    MIN_HOURS_PER_DAY, MAX_HOURS_PER_DAY, input.max_hours_per_day
                ),
            ));
        }

        if parse_start_time(&input.start_time).is_none() {
            violations.push(FieldViolation::new(
                "startTime",
                format!("必须为 24 小时制 HH:MM，实际 '{}'", input.start_time),
            ));
        }

        violations
    }
}

// ==========================================
// EntityValidator - 实体表单校验
// ==========================================
pub struct EntityValidator;

impl EntityValidator {
    pub fn validate_driver(driver: &Driver) -> ApiResult<()> {
        let mut violations = Vec::new();
        if driver.name.trim().is_empty() {
            violations.push(FieldViolation::new("name", "不能为空"));
        }
        if !(driver.current_shift_hours >= 0.0) {
            violations.push(FieldViolation::new("currentShiftHours", "不能为负"));
        }
        if !(driver.past_7_day_work_hours >= 0.0 && driver.past_7_day_work_hours <= MAX_PAST_WEEK_HOURS) {
            violations.push(FieldViolation::new(
                "past7DayWorkHours",
                format!("必须在 0 到 {} 之间", MAX_PAST_WEEK_HOURS),
            ));
        }
        into_result(violations)
    }

    pub fn validate_route(route: &Route) -> ApiResult<()> {
        let mut violations = Vec::new();
        if route.route_id.trim().is_empty() {
            violations.push(FieldViolation::new("routeId", "不能为空"));
        }
        if !(route.distance_km > 0.0) {
            violations.push(FieldViolation::new("distanceKm", "必须大于0"));
        }
        if !(route.base_time_minutes > 0.0) {
            violations.push(FieldViolation::new("baseTimeMinutes", "必须大于0"));
        }
        into_result(violations)
    }

    /// 线路存在性由调用方检查
    pub fn validate_order(order: &Order) -> ApiResult<()> {
        let mut violations = Vec::new();
        if order.order_id.trim().is_empty() {
            violations.push(FieldViolation::new("orderId", "不能为空"));
        }
        if !(order.value_rs > 0.0) {
            violations.push(FieldViolation::new("valueRs", "必须大于0"));
        }
        if order.assigned_route.trim().is_empty() {
            violations.push(FieldViolation::new("assignedRoute", "不能为空"));
        }
        into_result(violations)
    }
}
