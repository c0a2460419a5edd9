// ==========================================
// 车队物流排班模拟系统 - 模拟运行领域模型
// ==========================================
// 职责: 模拟输入 / 单订单结果 / KPI 汇总 / 运行记录
// 红线: SimulationRun 一经记录不可修改 (只追加历史)
// ==========================================

use crate::domain::types::TrafficLevel;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

// ==========================================
// SimulationInput - 排班配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInput {
    pub available_drivers: usize, // 可用司机数
    pub start_time: String,       // 发车时间 (HH:MM, 24小时制)
    pub max_hours_per_day: f64,   // 单司机当日工时上限 (1~24)

    /// 模拟日期; 缺省时取最早截止时间所在日期
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_date: Option<NaiveDate>,
}

impl SimulationInput {
    pub fn new(available_drivers: usize, start_time: &str, max_hours_per_day: f64) -> Self {
        Self {
            available_drivers,
            start_time: start_time.to_string(),
            max_hours_per_day,
            plan_date: None,
        }
    }

    /// 指定模拟日期
    pub fn with_plan_date(mut self, plan_date: NaiveDate) -> Self {
        self.plan_date = Some(plan_date);
        self
    }
}

/// 解析 HH:MM（小时允许 1~2 位, 分钟必须 2 位）
///
/// 返回 None 表示格式非法或越界
pub fn parse_start_time(raw: &str) -> Option<NaiveTime> {
    let (hour_part, minute_part) = raw.trim().split_once(':')?;

    if hour_part.is_empty()
        || hour_part.len() > 2
        || minute_part.len() != 2
        || !hour_part.chars().all(|c| c.is_ascii_digit())
        || !minute_part.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let hour: u32 = hour_part.parse().ok()?;
    let minute: u32 = minute_part.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}

// ==========================================
// PerOrderResult - 单订单模拟结果
// ==========================================
// 派生数据,不单独持久化 (随 SimulationRun 整体落库)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerOrderResult {
    pub order_id: String,
    pub route_id: String,
    pub traffic_level: TrafficLevel,
    pub assigned_driver_id: Option<String>,     // None = 本次无法分配
    pub completion_time: Option<NaiveDateTime>, // None = 本次无法分配
    pub traversal_minutes: Option<f64>,         // 含疲劳折算的行驶耗时
    pub is_late: bool,
    pub fuel_cost: f64,
    pub bonus: f64,
    pub penalty: f64,
    pub net_contribution: f64,
}

impl PerOrderResult {
    pub fn is_assigned(&self) -> bool {
        self.assigned_driver_id.is_some()
    }
}

// ==========================================
// ChartPoint - 图表数据点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

// ==========================================
// KpiSummary - KPI 汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub total_profit: f64,
    pub efficiency_score: f64, // 0~100
    pub on_time_deliveries: usize,
    pub total_deliveries: usize,
    pub fuel_cost: f64,
    pub bonuses: f64,
    pub penalties: f64,
    pub delivery_breakdown: Vec<ChartPoint>,  // On-Time / Late
    pub fuel_cost_breakdown: Vec<ChartPoint>, // Low / Medium / High
}

impl KpiSummary {
    /// 迟到订单数
    pub fn late_deliveries(&self) -> usize {
        self.total_deliveries - self.on_time_deliveries
    }

    /// 无运行记录时的空汇总（驾驶舱使用）
    pub fn empty() -> Self {
        Self {
            total_profit: 0.0,
            efficiency_score: 0.0,
            on_time_deliveries: 0,
            total_deliveries: 0,
            fuel_cost: 0.0,
            bonuses: 0.0,
            penalties: 0.0,
            delivery_breakdown: Vec::new(),
            fuel_cost_breakdown: Vec::new(),
        }
    }
}

// ==========================================
// SimulationRun - 模拟运行记录
// ==========================================
// 只由引擎创建; 历史只追加,不覆盖
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRun {
    pub run_id: String,
    pub timestamp: NaiveDateTime,
    pub inputs: SimulationInput,
    pub results: KpiSummary,
    pub order_results: Vec<PerOrderResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start_time_accepts_valid_formats() {
        assert_eq!(parse_start_time("09:00"), NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(parse_start_time("9:30"), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(parse_start_time("23:59"), NaiveTime::from_hms_opt(23, 59, 0));
        assert_eq!(parse_start_time("00:00"), NaiveTime::from_hms_opt(0, 0, 0));
    }

    #[test]
    fn test_parse_start_time_rejects_invalid_formats() {
        assert_eq!(parse_start_time("24:00"), None);
        assert_eq!(parse_start_time("12:60"), None);
        assert_eq!(parse_start_time("12:5"), None);
        assert_eq!(parse_start_time("123:00"), None);
        assert_eq!(parse_start_time("ab:cd"), None);
        assert_eq!(parse_start_time("0900"), None);
        assert_eq!(parse_start_time(""), None);
    }

    #[test]
    fn test_simulation_input_serde_uses_camel_case() {
        let input = SimulationInput::new(3, "09:00", 8.0);
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["availableDrivers"], 3);
        assert_eq!(json["startTime"], "09:00");
        assert_eq!(json["maxHoursPerDay"], 8.0);
        assert!(json.get("planDate").is_none());

        let parsed: SimulationInput =
            serde_json::from_str(r#"{"availableDrivers":2,"startTime":"10:15","maxHoursPerDay":6}"#)
                .unwrap();
        assert_eq!(parsed.available_drivers, 2);
        assert_eq!(parsed.plan_date, None);
    }

    #[test]
    fn test_kpi_summary_late_deliveries() {
        let mut summary = KpiSummary::empty();
        summary.total_deliveries = 5;
        summary.on_time_deliveries = 3;
        assert_eq!(summary.late_deliveries(), 2);
    }
}
