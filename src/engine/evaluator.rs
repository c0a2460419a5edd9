// ==========================================
// 车队物流排班模拟系统 - 订单结果评估
// ==========================================
// 规则:
// - 迟到: 完成时间 > 截止时间; 未分配视为迟到
// - 罚金: 迟到时按货值比例计罚 (默认 10%)
// - 奖励: 货值 > 1000 且准时 => 货值 × 10%
// - 燃油: 由 CostModel 按线路计算,未分配订单同样计入
// - 净贡献 = 货值 + 奖励 - 罚金 - 燃油
// ==========================================

use crate::config::SimulationParameters;
use crate::domain::fleet::{Order, Route};
use crate::domain::simulation::PerOrderResult;
use crate::engine::allocator::Allocation;
use crate::engine::cost::CostModel;

pub struct OutcomeEvaluator {
    cost_model: CostModel,
    bonus_value_threshold: f64,
    bonus_rate: f64,
    late_penalty_rate: f64,
}

impl OutcomeEvaluator {
    pub fn new(
        cost_model: CostModel,
        bonus_value_threshold: f64,
        bonus_rate: f64,
        late_penalty_rate: f64,
    ) -> Self {
        Self {
            cost_model,
            bonus_value_threshold,
            bonus_rate,
            late_penalty_rate,
        }
    }

    pub fn from_parameters(params: &SimulationParameters) -> Self {
        Self::new(
            CostModel::from_parameters(params),
            params.bonus_value_threshold,
            params.bonus_rate,
            params.late_penalty_rate,
        )
    }

    /// 评估单个订单
    pub fn evaluate(&self, order: &Order, route: &Route, allocation: &Allocation) -> PerOrderResult {
        let is_late = match allocation.completion_time {
            Some(done) => done > order.delivery_timestamp,
            None => true,
        };

        let fuel_cost = self.cost_model.fuel_cost(route);
        let penalty = if is_late {
            self.late_penalty_rate * order.value_rs
        } else {
            0.0
        };
        let bonus = if !is_late && order.value_rs > self.bonus_value_threshold {
            self.bonus_rate * order.value_rs
        } else {
            0.0
        };

        PerOrderResult {
            order_id: order.order_id.clone(),
            route_id: route.route_id.clone(),
            traffic_level: route.traffic_level,
            assigned_driver_id: allocation.driver_id.clone(),
            completion_time: allocation.completion_time,
            traversal_minutes: allocation.traversal_minutes,
            is_late,
            fuel_cost,
            bonus,
            penalty,
            net_contribution: order.value_rs + bonus - penalty - fuel_cost,
        }
    }
}

impl Default for OutcomeEvaluator {
    fn default() -> Self {
        Self::from_parameters(&SimulationParameters::default())
    }
}
