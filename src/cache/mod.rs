//! 对象缓存
//!
//! 后端以插件形式在加载期注册（见 [`register`]），启动时按配置选择。
//! 值统一以 JSON 字符串存储，[`get_json`] / [`insert_json`] 负责编解码。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端异常或值无法解析
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` 为 0 时使用后端默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 读取并反序列化 JSON 缓存值，解析失败时删除该键
pub async fn get_json<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> CacheResult<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(json) => match serde_json::from_str::<T>(&json) {
            Ok(value) => CacheResult::Found(value),
            Err(e) => {
                debug!("Dropping undecodable cache entry {}: {}", key, e);
                cache.remove(key).await;
                CacheResult::ExistsButNoValue
            }
        },
        CacheResult::NotFound => CacheResult::NotFound,
        CacheResult::ExistsButNoValue => CacheResult::ExistsButNoValue,
    }
}

/// 序列化为 JSON 后写入缓存
pub async fn insert_json<T: Serialize>(cache: &dyn ObjectCache, key: &str, value: &T, ttl: u64) {
    match serde_json::to_string(value) {
        Ok(json) => cache.insert_raw(key.to_string(), json, ttl).await,
        Err(e) => debug!("Skipping cache insert for {}: {}", key, e),
    }
}

/// 声明缓存插件，在加载期注册构造函数
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new().map_err(|e| {
                            $crate::errors::SkillSparkError::cache_connection(format!(
                                "{} cache init failed: {}",
                                $name, e
                            ))
                        })?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Entry {
        id: i64,
        title: String,
    }

    #[tokio::test]
    async fn test_json_roundtrip_through_cache() {
        let cache = MokaCacheWrapper::with_capacity(16, 60);
        let entry = Entry {
            id: 1,
            title: "Rust".into(),
        };
        insert_json(&cache, "all_subjects", &entry, 0).await;
        assert_eq!(
            get_json::<Entry>(&cache, "all_subjects").await,
            CacheResult::Found(entry)
        );
        assert_eq!(
            get_json::<Entry>(&cache, "missing").await,
            CacheResult::NotFound
        );
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_removed() {
        let cache = MokaCacheWrapper::with_capacity(16, 60);
        cache
            .insert_raw("all_courses".into(), "not json".into(), 0)
            .await;
        assert_eq!(
            get_json::<Entry>(&cache, "all_courses").await,
            CacheResult::ExistsButNoValue
        );
        assert_eq!(cache.get_raw("all_courses").await, CacheResult::NotFound);
    }
}
