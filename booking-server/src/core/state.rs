use std::sync::Arc;

use crate::bookings::{BookingManager, BookingPolicy, BookingStorage};
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::services::CatalogService;

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，每个 handler 拿到的都是同一组服务。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | catalog | Arc<CatalogService> | 桌台/菜单只读缓存 |
/// | bookings | Arc<BookingManager> | 订座引擎 (redb) |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 目录服务 (SQLite 加载到内存)
    pub catalog: Arc<CatalogService>,
    /// 订座引擎
    pub bookings: Arc<BookingManager>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`initialize()`](Self::initialize) 代替；测试里用内存目录和内存 redb 直接拼装
    pub fn new(config: Config, catalog: Arc<CatalogService>, bookings: Arc<BookingManager>) -> Self {
        Self {
            config,
            catalog,
            bookings,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. SQLite 目录库 (work_dir/catalog.db) 并预热缓存
    /// 3. redb 订座库 (work_dir/bookings.redb)
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.catalog_db_path();
        let db = DbService::new(&db_path.to_string_lossy())
            .await
            .map_err(|e| crate::core::ServerError::Database(e.message))?;

        let catalog = Arc::new(CatalogService::load(&db.pool).await?);
        tracing::info!(
            tables = catalog.table_count(),
            menu_items = catalog.menu_item_count(),
            "Catalog loaded"
        );

        let storage = BookingStorage::open(config.bookings_db_path())?;
        let bookings = Arc::new(BookingManager::new(
            storage,
            catalog.clone(),
            BookingPolicy::from_config(config),
        ));

        Ok(Self::new(config.clone(), catalog, bookings))
    }

    /// 获取订座引擎
    pub fn bookings(&self) -> Arc<BookingManager> {
        self.bookings.clone()
    }
}
