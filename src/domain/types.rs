// ==========================================
// 车队物流排班模拟系统 - 领域类型定义
// ==========================================
// 职责: 路况等级与各类展示用分级枚举
// 红线: 分级只用于展示,引擎计算只依赖阈值判定
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 路况等级 (Traffic Level)
// ==========================================
// 顺序: Low < Medium < High
// 序列化格式: 与界面一致 (Low/Medium/High)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrafficLevel {
    Low,    // 畅通
    Medium, // 一般
    High,   // 拥堵 (燃油附加)
}

impl TrafficLevel {
    /// 图表分桶的固定顺序
    pub const ALL: [TrafficLevel; 3] = [TrafficLevel::Low, TrafficLevel::Medium, TrafficLevel::High];

    /// 从字符串解析路况等级（大小写不敏感）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Some(TrafficLevel::Low),
            "MEDIUM" => Some(TrafficLevel::Medium),
            "HIGH" => Some(TrafficLevel::High),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TrafficLevel::Low => "Low",
            TrafficLevel::Medium => "Medium",
            TrafficLevel::High => "High",
        }
    }
}

impl fmt::Display for TrafficLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 司机疲劳状态 (Fatigue Status)
// ==========================================
// 仅用于展示: Tired 区间不参与引擎计算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FatigueStatus {
    Fresh,    // 状态良好
    Tired,    // 疲惫 (仅提示)
    Fatigued, // 疲劳 (次日降速)
}

impl fmt::Display for FatigueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatigueStatus::Fresh => write!(f, "FRESH"),
            FatigueStatus::Tired => write!(f, "TIRED"),
            FatigueStatus::Fatigued => write!(f, "FATIGUED"),
        }
    }
}

// ==========================================
// 订单优先级 (Order Priority)
// ==========================================
// 按货值分级: >=2000 高, >=1000 中, 其余低
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderPriority {
    Low,
    Medium,
    High,
}

impl OrderPriority {
    pub fn from_value(value_rs: f64) -> Self {
        if value_rs >= 2000.0 {
            OrderPriority::High
        } else if value_rs >= 1000.0 {
            OrderPriority::Medium
        } else {
            OrderPriority::Low
        }
    }
}

impl fmt::Display for OrderPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderPriority::Low => write!(f, "LOW"),
            OrderPriority::Medium => write!(f, "MEDIUM"),
            OrderPriority::High => write!(f, "HIGH"),
        }
    }
}

// ==========================================
// 线路效率 (Route Efficiency)
// ==========================================
// 口径: 每公里基准耗时（分钟）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteEfficiency {
    Excellent, // < 2 min/km
    Good,      // < 3 min/km
    Average,   // < 4 min/km
    Slow,      // 其余
}

impl RouteEfficiency {
    pub fn from_minutes_per_km(minutes_per_km: f64) -> Self {
        if minutes_per_km < 2.0 {
            RouteEfficiency::Excellent
        } else if minutes_per_km < 3.0 {
            RouteEfficiency::Good
        } else if minutes_per_km < 4.0 {
            RouteEfficiency::Average
        } else {
            RouteEfficiency::Slow
        }
    }
}

impl fmt::Display for RouteEfficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteEfficiency::Excellent => write!(f, "EXCELLENT"),
            RouteEfficiency::Good => write!(f, "GOOD"),
            RouteEfficiency::Average => write!(f, "AVERAGE"),
            RouteEfficiency::Slow => write!(f, "SLOW"),
        }
    }
}
