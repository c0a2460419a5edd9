use serde::{Deserialize, Serialize};

/// 模拟业务参数（一次运行内不变）
///
/// 来源：config_kv（scope_id='global'），缺失或格式错误时回退到默认值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// 疲劳阈值（小时）：当班工时严格大于该值视为疲劳
    pub fatigue_threshold_hours: f64,

    /// 疲劳司机速度系数（0~1]
    pub fatigued_speed_factor: f64,

    /// “疲惫”提示阈值（小时），仅用于展示
    pub tired_threshold_hours: f64,

    /// 燃油基础费率（每公里）
    pub fuel_rate_per_km: f64,

    /// 拥堵附加费率（每公里）
    pub high_traffic_surcharge_per_km: f64,

    /// 准时奖励货值门槛（严格大于）
    pub bonus_value_threshold: f64,

    /// 准时奖励比例
    pub bonus_rate: f64,

    /// 迟到罚金比例（按货值）
    pub late_penalty_rate: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            fatigue_threshold_hours: 8.0,
            fatigued_speed_factor: 0.7,
            tired_threshold_hours: 6.0,
            fuel_rate_per_km: 5.0,
            high_traffic_surcharge_per_km: 2.0,
            bonus_value_threshold: 1000.0,
            bonus_rate: 0.10,
            late_penalty_rate: 0.10,
        }
    }
}

impl SimulationParameters {
    /// 参数合法性校验
    ///
    /// # 返回
    /// - Ok(()): 合法
    /// - Err(String): 第一个不合法参数的说明
    pub fn validate(&self) -> Result<(), String> {
        if !(self.fatigued_speed_factor > 0.0 && self.fatigued_speed_factor <= 1.0) {
            return Err(format!(
                "fatigued_speed_factor 必须在 (0,1] 内，实际 {}",
                self.fatigued_speed_factor
            ));
        }
        if !(self.fatigue_threshold_hours >= 0.0) {
            return Err(format!(
                "fatigue_threshold_hours 不能为负，实际 {}",
                self.fatigue_threshold_hours
            ));
        }
        if !(self.fuel_rate_per_km > 0.0) {
            return Err(format!("fuel_rate_per_km 必须大于0，实际 {}", self.fuel_rate_per_km));
        }
        if !(self.high_traffic_surcharge_per_km >= 0.0) {
            return Err(format!(
                "high_traffic_surcharge_per_km 不能为负，实际 {}",
                self.high_traffic_surcharge_per_km
            ));
        }
        if !(self.bonus_rate >= 0.0) {
            return Err(format!("bonus_rate 不能为负，实际 {}", self.bonus_rate));
        }
        // 迟到必有罚金，比例必须为正
        if !(self.late_penalty_rate > 0.0 && self.late_penalty_rate <= 1.0) {
            return Err(format!(
                "late_penalty_rate 必须在 (0,1] 内，实际 {}",
                self.late_penalty_rate
            ));
        }
        Ok(())
    }
}
