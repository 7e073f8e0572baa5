use chrono_tz::Tz;
use std::path::PathBuf;

/// Longest seating window a booking may hold (one day)
pub const MAX_SEATING_MINUTES_CEILING: u32 = 24 * 60;

/// 服务器配置 - 订座服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (catalog.db, bookings.redb, logs/) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | BUSINESS_TIMEZONE | UTC | 业务时区 (IANA) |
/// | DEFAULT_SEATING_MINUTES | 120 | 默认用餐时长 |
/// | MAX_SEATING_MINUTES | 360 | 最长用餐时长 |
/// | REQUEST_TIMEOUT_MS | 5000 | 请求超时(毫秒)，写预算取其 80% |
/// | STORE_RETRY_ATTEMPTS | 3 | 存储不可用时的重试次数 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/booking HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别 (tracing filter)
    pub log_level: String,
    /// 业务时区，用于判断时段是否已过
    pub business_timezone: Tz,
    /// 未指定时长时的默认用餐时长 (分钟)
    pub default_seating_minutes: u32,
    /// 允许的最长用餐时长 (分钟)
    pub max_seating_minutes: u32,
    /// 请求超时时间 (毫秒)，写预算由此推导
    pub request_timeout_ms: u64,
    /// StoreUnavailable 的最大尝试次数
    pub store_retry_attempts: u32,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let tz_name = std::env::var("BUSINESS_TIMEZONE").unwrap_or_else(|_| "UTC".into());
        let business_timezone = tz_name.parse::<Tz>().unwrap_or_else(|_| {
            tracing::warn!(timezone = %tz_name, "Unknown BUSINESS_TIMEZONE, falling back to UTC");
            Tz::UTC
        });

        let config = Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: env_or("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            business_timezone,
            default_seating_minutes: env_or("DEFAULT_SEATING_MINUTES", 120),
            max_seating_minutes: env_or("MAX_SEATING_MINUTES", 360),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 5000),
            store_retry_attempts: env_or("STORE_RETRY_ATTEMPTS", 3),
        };
        config.normalized()
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 修正越界的时长配置
    ///
    /// max ∈ [1, 1440]，default ∈ [1, max]，attempts >= 1
    fn normalized(mut self) -> Self {
        self.max_seating_minutes = self.max_seating_minutes.clamp(1, MAX_SEATING_MINUTES_CEILING);
        self.default_seating_minutes = self
            .default_seating_minutes
            .clamp(1, self.max_seating_minutes);
        self.store_retry_attempts = self.store_retry_attempts.max(1);
        self
    }

    /// SQLite 目录数据库路径
    pub fn catalog_db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("catalog.db")
    }

    /// redb 订座数据库路径
    pub fn bookings_db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("bookings.redb")
    }

    /// 日志目录
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    /// 写操作总预算 (毫秒): 请求超时的 80%
    ///
    /// 严格小于请求超时，HTTP 层超时前引擎已放弃并回滚。
    pub fn write_budget_ms(&self) -> u64 {
        self.request_timeout_ms.saturating_mul(4) / 5
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_clamps_durations() {
        let mut config = Config::with_overrides("/tmp/booking-test", 0);
        config.max_seating_minutes = 10_000;
        config.default_seating_minutes = 0;
        config.store_retry_attempts = 0;
        let config = config.normalized();
        assert_eq!(config.max_seating_minutes, MAX_SEATING_MINUTES_CEILING);
        assert_eq!(config.default_seating_minutes, 1);
        assert_eq!(config.store_retry_attempts, 1);
    }

    #[test]
    fn test_write_budget_below_request_timeout() {
        let mut config = Config::with_overrides("/tmp/booking-test", 0);
        for timeout in [1, 100, 5000, u64::MAX] {
            config.request_timeout_ms = timeout;
            assert!(config.write_budget_ms() < timeout);
        }
        config.request_timeout_ms = 5000;
        assert_eq!(config.write_budget_ms(), 4000);
    }

    #[test]
    fn test_paths_live_under_work_dir() {
        let config = Config::with_overrides("/srv/booking", 8080);
        assert_eq!(config.catalog_db_path(), PathBuf::from("/srv/booking/catalog.db"));
        assert_eq!(
            config.bookings_db_path(),
            PathBuf::from("/srv/booking/bookings.redb")
        );
        assert_eq!(config.log_dir(), PathBuf::from("/srv/booking/logs"));
    }
}
