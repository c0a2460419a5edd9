// ==========================================
// 车队物流排班模拟系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::simulation_config_trait::SimulationConfigReader;
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        tracing::info!(config_key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 读取浮点配置，缺失或格式错误时回退默认值
    fn get_f64_or_default(&self, key: &str, default: f64) -> ConfigResult<f64> {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default,
                    "配置值格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 排查一次模拟使用了哪些业务参数
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

// ==========================================
// SimulationConfigReader Trait 实现
// ==========================================
#[async_trait]
impl SimulationConfigReader for ConfigManager {
    async fn get_fatigue_threshold_hours(&self) -> ConfigResult<f64> {
        self.get_f64_or_default(config_keys::FATIGUE_THRESHOLD_HOURS, 8.0)
    }

    async fn get_fatigued_speed_factor(&self) -> ConfigResult<f64> {
        self.get_f64_or_default(config_keys::FATIGUED_SPEED_FACTOR, 0.7)
    }

    async fn get_tired_threshold_hours(&self) -> ConfigResult<f64> {
        self.get_f64_or_default(config_keys::TIRED_THRESHOLD_HOURS, 6.0)
    }

    async fn get_fuel_rate_per_km(&self) -> ConfigResult<f64> {
        self.get_f64_or_default(config_keys::FUEL_RATE_PER_KM, 5.0)
    }

    async fn get_high_traffic_surcharge_per_km(&self) -> ConfigResult<f64> {
        self.get_f64_or_default(config_keys::HIGH_TRAFFIC_SURCHARGE_PER_KM, 2.0)
    }

    async fn get_bonus_value_threshold(&self) -> ConfigResult<f64> {
        self.get_f64_or_default(config_keys::BONUS_VALUE_THRESHOLD, 1000.0)
    }

    async fn get_bonus_rate(&self) -> ConfigResult<f64> {
        self.get_f64_or_default(config_keys::BONUS_RATE, 0.10)
    }

    async fn get_late_penalty_rate(&self) -> ConfigResult<f64> {
        self.get_f64_or_default(config_keys::LATE_PENALTY_RATE, 0.10)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 疲劳模型
    pub const FATIGUE_THRESHOLD_HOURS: &str = "fatigue_threshold_hours";
    pub const FATIGUED_SPEED_FACTOR: &str = "fatigued_speed_factor";
    pub const TIRED_THRESHOLD_HOURS: &str = "tired_threshold_hours";

    // 成本模型
    pub const FUEL_RATE_PER_KM: &str = "fuel_rate_per_km";
    pub const HIGH_TRAFFIC_SURCHARGE_PER_KM: &str = "high_traffic_surcharge_per_km";

    // 奖惩
    pub const BONUS_VALUE_THRESHOLD: &str = "bonus_value_threshold";
    pub const BONUS_RATE: &str = "bonus_rate";
    pub const LATE_PENALTY_RATE: &str = "late_penalty_rate";
}
