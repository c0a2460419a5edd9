// ==========================================
// 车队物流排班模拟系统 - 模拟配置读取 Trait
// ==========================================
// 职责: 定义模拟引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::simulation_params::SimulationParameters;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// SimulationConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait SimulationConfigReader: Send + Sync {
    // ===== 疲劳模型 =====

    /// 疲劳阈值（小时）
    ///
    /// # 默认值
    /// - 8
    async fn get_fatigue_threshold_hours(&self) -> Result<f64, Box<dyn Error + Send + Sync>>;

    /// 疲劳速度系数
    ///
    /// # 默认值
    /// - 0.7
    async fn get_fatigued_speed_factor(&self) -> Result<f64, Box<dyn Error + Send + Sync>>;

    /// 疲惫提示阈值（小时，仅展示）
    ///
    /// # 默认值
    /// - 6
    async fn get_tired_threshold_hours(&self) -> Result<f64, Box<dyn Error + Send + Sync>>;

    // ===== 成本模型 =====

    /// 燃油基础费率（每公里）
    ///
    /// # 默认值
    /// - 5
    async fn get_fuel_rate_per_km(&self) -> Result<f64, Box<dyn Error + Send + Sync>>;

    /// 拥堵附加费率（每公里）
    ///
    /// # 默认值
    /// - 2
    async fn get_high_traffic_surcharge_per_km(&self)
        -> Result<f64, Box<dyn Error + Send + Sync>>;

    // ===== 奖惩 =====

    /// 准时奖励货值门槛
    ///
    /// # 默认值
    /// - 1000
    async fn get_bonus_value_threshold(&self) -> Result<f64, Box<dyn Error + Send + Sync>>;

    /// 准时奖励比例
    ///
    /// # 默认值
    /// - 0.10
    async fn get_bonus_rate(&self) -> Result<f64, Box<dyn Error + Send + Sync>>;

    /// 迟到罚金比例
    ///
    /// # 默认值
    /// - 0.10
    async fn get_late_penalty_rate(&self) -> Result<f64, Box<dyn Error + Send + Sync>>;

    /// 一次性读取全部模拟参数
    async fn load_simulation_parameters(
        &self,
    ) -> Result<SimulationParameters, Box<dyn Error + Send + Sync>> {
        Ok(SimulationParameters {
            fatigue_threshold_hours: self.get_fatigue_threshold_hours().await?,
            fatigued_speed_factor: self.get_fatigued_speed_factor().await?,
            tired_threshold_hours: self.get_tired_threshold_hours().await?,
            fuel_rate_per_km: self.get_fuel_rate_per_km().await?,
            high_traffic_surcharge_per_km: self.get_high_traffic_surcharge_per_km().await?,
            bonus_value_threshold: self.get_bonus_value_threshold().await?,
            bonus_rate: self.get_bonus_rate().await?,
            late_penalty_rate: self.get_late_penalty_rate().await?,
        })
    }
}
