//! 缓存层
//!
//! 目前只有进程内的 Moka 实现，JWT 中间件用它缓存已解析的身份。

pub mod object_cache;
mod traits;

use std::sync::Arc;

pub use traits::{CacheResult, ObjectCache};

/// 创建缓存实例
pub fn create_cache() -> Arc<dyn ObjectCache> {
    Arc::new(object_cache::moka::MokaCacheWrapper::new())
}
