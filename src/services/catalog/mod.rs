pub mod detail;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use std::sync::Arc;

use crate::cache::{CacheResult, ObjectCache, get_json, insert_json};
use crate::errors::Result;
use crate::storage::Storage;

pub const ALL_SUBJECTS_KEY: &str = "all_subjects";
pub const ALL_COURSES_KEY: &str = "all_courses";

pub fn subject_courses_key(subject_id: i64) -> String {
    format!("subject_{subject_id}_courses")
}

pub struct CatalogService {
    storage: Option<Arc<dyn Storage>>,
    cache: Option<Arc<dyn ObjectCache>>,
}

impl CatalogService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            cache: None,
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> ActixResult<Arc<dyn ObjectCache>> {
        match &self.cache {
            Some(cache) => Ok(cache.clone()),
            None => super::cache_from_request(request),
        }
    }

    pub async fn list_courses(
        &self,
        subject_slug: Option<String>,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, subject_slug, request).await
    }

    pub async fn course_detail(
        &self,
        course_slug: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        detail::course_detail(self, course_slug, request).await
    }
}

/// 先查缓存，未命中时调用 `load` 并写回；条目只按 TTL 过期
pub(crate) async fn cached_or_load<T, F, Fut>(
    cache: &dyn ObjectCache,
    key: &str,
    ttl: u64,
    load: F,
) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    if let CacheResult::Found(value) = get_json::<T>(cache, key).await {
        return Ok(value);
    }
    let value = load().await?;
    insert_json(cache, key, &value, ttl).await;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_subject_key_format() {
        assert_eq!(subject_courses_key(3), "subject_3_courses");
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let cache = MokaCacheWrapper::with_capacity(16, 60);
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        for _ in 0..2 {
            let value: Vec<i64> = cached_or_load(&cache, ALL_COURSES_KEY, 0, move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(vec![1, 2, 3])
            })
            .await
            .expect("load");
            assert_eq!(value, vec![1, 2, 3]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let cache = MokaCacheWrapper::with_capacity(16, 60);
        let result: Result<Vec<i64>> = cached_or_load(&cache, ALL_SUBJECTS_KEY, 0, || async {
            Err(crate::errors::SkillSparkError::database_operation("down"))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(cache.get_raw(ALL_SUBJECTS_KEY).await, CacheResult::NotFound);
    }
}
