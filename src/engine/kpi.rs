// ==========================================
// 车队物流排班模拟系统 - KPI 汇总
// ==========================================
// 输出: 总利润 / 效率分 / 燃油 / 奖励 / 罚金 + 两组图表数据
// 图表顺序固定: 准时率 [On-Time, Late]; 燃油 [Low, Medium, High]
// ==========================================

use crate::domain::simulation::{ChartPoint, KpiSummary, PerOrderResult};
use crate::domain::types::TrafficLevel;

pub const LABEL_ON_TIME: &str = "On-Time";
pub const LABEL_LATE: &str = "Late";

pub struct KpiAggregator;

impl KpiAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 汇总单订单结果
    ///
    /// 无订单时效率分为 0
    pub fn aggregate(&self, results: &[PerOrderResult]) -> KpiSummary {
        let total_deliveries = results.len();
        let on_time_deliveries = results.iter().filter(|r| !r.is_late).count();

        let total_profit: f64 = results.iter().map(|r| r.net_contribution).sum();
        let fuel_cost: f64 = results.iter().map(|r| r.fuel_cost).sum();
        let bonuses: f64 = results.iter().map(|r| r.bonus).sum();
        let penalties: f64 = results.iter().map(|r| r.penalty).sum();

        let efficiency_score = if total_deliveries == 0 {
            0.0
        } else {
            100.0 * on_time_deliveries as f64 / total_deliveries as f64
        };

        let delivery_breakdown = vec![
            ChartPoint::new(LABEL_ON_TIME, on_time_deliveries as f64),
            ChartPoint::new(LABEL_LATE, (total_deliveries - on_time_deliveries) as f64),
        ];

        let fuel_cost_breakdown = TrafficLevel::ALL
            .iter()
            .map(|level| {
                let sum: f64 = results
                    .iter()
                    .filter(|r| r.traffic_level == *level)
                    .map(|r| r.fuel_cost)
                    .sum();
                ChartPoint::new(level.to_db_str(), sum)
            })
            .collect();

        KpiSummary {
            total_profit,
            efficiency_score,
            on_time_deliveries,
            total_deliveries,
            fuel_cost,
            bonuses,
            penalties,
            delivery_breakdown,
            fuel_cost_breakdown,
        }
    }
}

impl Default for KpiAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, level: TrafficLevel, is_late: bool, fuel: f64, net: f64) -> PerOrderResult {
        PerOrderResult {
            order_id: id.to_string(),
            route_id: "R1".to_string(),
            traffic_level: level,
            assigned_driver_id: Some("D1".to_string()),
            completion_time: None,
            traversal_minutes: Some(30.0),
            is_late,
            fuel_cost: fuel,
            bonus: 0.0,
            penalty: if is_late { 10.0 } else { 0.0 },
            net_contribution: net,
        }
    }

    #[test]
    fn test_empty_results() {
        let summary = KpiAggregator::new().aggregate(&[]);
        assert_eq!(summary.total_deliveries, 0);
        assert_eq!(summary.efficiency_score, 0.0);
        assert_eq!(summary.total_profit, 0.0);
        assert_eq!(summary.delivery_breakdown[0], ChartPoint::new("On-Time", 0.0));
        assert_eq!(summary.delivery_breakdown[1], ChartPoint::new("Late", 0.0));
        let labels: Vec<&str> = summary.fuel_cost_breakdown.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Low", "Medium", "High"]);
    }

    #[test]
    fn test_totals_and_breakdowns() {
        let results = vec![
            result("O1", TrafficLevel::High, false, 70.0, 500.0),
            result("O2", TrafficLevel::Low, true, 50.0, 300.0),
            result("O3", TrafficLevel::High, false, 14.0, 100.0),
            result("O4", TrafficLevel::Low, false, 5.0, 100.0),
        ];

        let summary = KpiAggregator::new().aggregate(&results);

        assert_eq!(summary.total_deliveries, 4);
        assert_eq!(summary.on_time_deliveries, 3);
        assert_eq!(summary.efficiency_score, 75.0);
        assert_eq!(summary.total_profit, 1000.0);
        assert_eq!(summary.fuel_cost, 139.0);
        assert_eq!(summary.penalties, 10.0);
        assert_eq!(summary.fuel_cost_breakdown[0].value, 55.0);
        assert_eq!(summary.fuel_cost_breakdown[1].value, 0.0);
        assert_eq!(summary.fuel_cost_breakdown[2].value, 84.0);

        let breakdown_sum: f64 = summary.fuel_cost_breakdown.iter().map(|p| p.value).sum();
        assert_eq!(breakdown_sum, summary.fuel_cost);
    }
}
