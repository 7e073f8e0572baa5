//! Booking Server - 餐厅订座与预点餐引擎
//!
//! # 架构概述
//!
//! - **目录** (`services`): SQLite 桌台/菜单，启动时加载到内存缓存
//! - **订座** (`bookings`): redb 事务内原子完成 "检查时段 + 写入预约与订单项"
//! - **HTTP API** (`api`): axum 路由，调用方身份由上游网关注入
//!
//! # 模块结构
//!
//! ```text
//! booking-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── db/            # SQLite 连接池、迁移、目录查询
//! ├── services/      # CatalogService (内存缓存)
//! ├── bookings/      # 可用性、计价、生命周期、存储、BookingManager
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、时间解析、输入校验
//! ```

pub mod api;
pub mod bookings;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use bookings::{BookingError, BookingManager, BookingPolicy, BookingStorage};
pub use core::{Config, Server, ServerState};
pub use services::{CatalogService, CatalogStore};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ErrorBody, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: 创建工作目录、初始化日志 (生产环境输出 JSON)
///
/// `.env` 需在 [`Config::from_env`] 之前加载。
pub fn setup_environment(config: &Config) -> std::io::Result<()> {
    config.ensure_work_dir_structure()?;
    let log_dir = config.log_dir();
    init_logger_with_file(
        &config.log_level,
        config.is_production(),
        Some(log_dir.as_path()),
    );
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____              __   _
   / __ )____  ____  / /__(_)___  ____ _
  / __  / __ \/ __ \/ //_/ / __ \/ __ `/
 / /_/ / /_/ / /_/ / ,< / / / / / /_/ /
/_____/\____/\____/_/|_/_/_/ /_/\__, /
                               /____/
    "#
    );
}
