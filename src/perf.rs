// ==========================================
// 车队物流排班模拟系统 - 性能统计
// ==========================================
// - SQLite trace/profile 回调: SQL 计数 + 慢 SQL 日志
// - PerfGuard: 按 API 操作输出耗时与 SQL 数
// 环境变量:
// - FLEET_SIM_PERF_SQL=1       强制开启（Debug 默认开启, Release 默认关闭）
// - FLEET_SIM_SLOW_SQL_MS=50   慢 SQL 阈值（毫秒）
// ==========================================

use rusqlite::Connection;
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

pub const ENV_PERF_SQL: &str = "FLEET_SIM_PERF_SQL";
pub const ENV_SLOW_SQL_MS: &str = "FLEET_SIM_SLOW_SQL_MS";

static PERF_SQL_ENABLED: AtomicBool = AtomicBool::new(false);
static SLOW_SQL_THRESHOLD_MS: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static PERF_DEPTH: Cell<u32> = const { Cell::new(0) };
    static SQL_COUNT: Cell<u64> = const { Cell::new(0) };
    static SLOW_SQL_COUNT: Cell<u64> = const { Cell::new(0) };
}

/// SQL 追踪设置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerfSettings {
    pub enabled: bool,
    pub slow_sql_ms: u64,
}

impl PerfSettings {
    /// 由原始环境变量值解析（None 表示未设置）
    pub fn from_values(perf_sql: Option<&str>, slow_sql_ms: Option<&str>) -> Self {
        let enabled = match perf_sql {
            Some(v) => is_true(v),
            None => cfg!(debug_assertions),
        };
        let default_slow = if cfg!(debug_assertions) { 50 } else { 200 };
        let slow_sql_ms = slow_sql_ms
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(default_slow);

        Self { enabled, slow_sql_ms }
    }

    pub fn from_env() -> Self {
        let perf_sql = std::env::var(ENV_PERF_SQL).ok();
        let slow_sql_ms = std::env::var(ENV_SLOW_SQL_MS).ok();
        Self::from_values(perf_sql.as_deref(), slow_sql_ms.as_deref())
    }
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

fn truncate_sql(sql: &str, max_chars: usize) -> String {
    let s = sql.trim().replace('\n', " ");
    if s.chars().count() <= max_chars {
        return s;
    }
    let head: String = s.chars().take(max_chars).collect();
    format!("{}…", head)
}

/// 安装 SQLite 语句 trace/profile
pub fn install_sqlite_tracing(conn: &mut Connection) {
    let settings = PerfSettings::from_env();
    PERF_SQL_ENABLED.store(settings.enabled, Ordering::Relaxed);

    if !settings.enabled {
        // 复用连接时清理残留回调
        conn.trace(None);
        conn.profile(None);
        return;
    }

    SLOW_SQL_THRESHOLD_MS.store(settings.slow_sql_ms, Ordering::Relaxed);
    conn.trace(Some(sql_trace_callback));
    conn.profile(Some(sql_profile_callback));
}

fn sql_trace_callback(_sql: &str) {
    if !PERF_SQL_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    if PERF_DEPTH.with(|d| d.get() > 0) {
        SQL_COUNT.with(|c| c.set(c.get().saturating_add(1)));
    }
}

fn sql_profile_callback(sql: &str, duration: Duration) {
    if !PERF_SQL_ENABLED.load(Ordering::Relaxed) {
        return;
    }

    let ms = duration.as_millis() as u64;
    let threshold = SLOW_SQL_THRESHOLD_MS.load(Ordering::Relaxed);
    if threshold > 0 && ms >= threshold {
        tracing::warn!(
            target: "slow_sql",
            duration_ms = ms,
            sql = %truncate_sql(sql, 420),
            "slow sql"
        );
        if PERF_DEPTH.with(|d| d.get() > 0) {
            SLOW_SQL_COUNT.with(|c| c.set(c.get().saturating_add(1)));
        }
    }
}

/// 性能统计 Guard：drop 时输出 elapsed_ms + SQL 语句数 + 慢 SQL 数
///
/// ```ignore
/// let _perf = fleet_logistics_sim::perf::PerfGuard::new("run_simulation");
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    sql_start: u64,
    slow_sql_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        PERF_DEPTH.with(|d| d.set(d.get().saturating_add(1)));
        Self {
            op,
            start: Instant::now(),
            sql_start: SQL_COUNT.with(|c| c.get()),
            slow_sql_start: SLOW_SQL_COUNT.with(|c| c.get()),
        }
    }

    /// 当前 guard 内已执行的 SQL 数
    pub fn sql_count(&self) -> u64 {
        SQL_COUNT.with(|c| c.get()).saturating_sub(self.sql_start)
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let sql_count = self.sql_count();
        let slow_sql_count = SLOW_SQL_COUNT
            .with(|c| c.get())
            .saturating_sub(self.slow_sql_start);

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            sql_count,
            slow_sql_count,
            "done"
        );

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
