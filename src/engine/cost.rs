// ==========================================
// 车队物流排班模拟系统 - 燃油成本模型
// ==========================================
// 规则: 费用 = 5 × 公里数; 拥堵(High)另加 2 × 公里数
// 说明: 成本单位抽象,不做额外舍入
// ==========================================

use crate::config::SimulationParameters;
use crate::domain::fleet::Route;
use crate::domain::types::TrafficLevel;

/// 燃油成本模型（纯函数）
#[derive(Debug, Clone, PartialEq)]
pub struct CostModel {
    rate_per_km: f64,
    high_traffic_surcharge_per_km: f64,
}

impl CostModel {
    pub fn new(rate_per_km: f64, high_traffic_surcharge_per_km: f64) -> Self {
        Self {
            rate_per_km,
            high_traffic_surcharge_per_km,
        }
    }

    pub fn from_parameters(params: &SimulationParameters) -> Self {
        Self::new(params.fuel_rate_per_km, params.high_traffic_surcharge_per_km)
    }

    /// 单次线路通行的燃油成本（只与线路有关,与司机无关）
    pub fn fuel_cost(&self, route: &Route) -> f64 {
        let mut amount = self.rate_per_km * route.distance_km;
        if route.traffic_level == TrafficLevel::High {
            amount += self.high_traffic_surcharge_per_km * route.distance_km;
        }
        amount
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::from_parameters(&SimulationParameters::default())
    }
}
