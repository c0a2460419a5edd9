// ==========================================
// 车队物流排班模拟系统 - 疲劳模型
// ==========================================
// 规则: 当班工时 > 阈值(默认8h) => 本模拟日速度系数 0.7, 否则 1.0
// 红线: 6~8h 的“疲惫”仅用于展示,不参与计算
// ==========================================

use crate::config::SimulationParameters;
use crate::domain::fleet::Driver;
use crate::domain::types::FatigueStatus;

/// 疲劳模型（纯函数,无副作用）
#[derive(Debug, Clone, PartialEq)]
pub struct FatigueModel {
    threshold_hours: f64,
    fatigued_speed_factor: f64,
    tired_threshold_hours: f64,
}

impl FatigueModel {
    pub fn new(threshold_hours: f64, fatigued_speed_factor: f64, tired_threshold_hours: f64) -> Self {
        Self {
            threshold_hours,
            fatigued_speed_factor,
            tired_threshold_hours,
        }
    }

    pub fn from_parameters(params: &SimulationParameters) -> Self {
        Self::new(
            params.fatigue_threshold_hours,
            params.fatigued_speed_factor,
            params.tired_threshold_hours,
        )
    }

    /// 是否疲劳（严格大于阈值）
    pub fn is_fatigued(&self, driver: &Driver) -> bool {
        driver.current_shift_hours > self.threshold_hours
    }

    /// 速度系数 ∈ (0,1]
    pub fn speed_factor(&self, driver: &Driver) -> f64 {
        if self.is_fatigued(driver) {
            self.fatigued_speed_factor
        } else {
            1.0
        }
    }

    /// 展示用疲劳状态
    pub fn status(&self, driver: &Driver) -> FatigueStatus {
        if self.is_fatigued(driver) {
            FatigueStatus::Fatigued
        } else if driver.current_shift_hours > self.tired_threshold_hours {
            FatigueStatus::Tired
        } else {
            FatigueStatus::Fresh
        }
    }
}

impl Default for FatigueModel {
    fn default() -> Self {
        Self::from_parameters(&SimulationParameters::default())
    }
}
