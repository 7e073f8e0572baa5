//! 服务层 - 服务器核心服务
//!
//! # 服务列表
//!
//! - [`CatalogService`] - 桌台和菜单统一管理（含内存缓存）

pub mod catalog_service;

pub use catalog_service::{CatalogService, CatalogStore};
