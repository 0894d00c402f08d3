use serde::{Deserialize, Serialize};

/// 默认每页条数
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// 客户端可请求的最大每页条数
pub const MAX_PAGE_SIZE: i64 = 40;
/// 页码上限，保证 (page - 1) * page_size 不溢出
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

// 分页查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_page_size",
        alias = "size",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page_size: i64,
}

impl PaginationQuery {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    /// 页码限制在 1..=MAX_PAGE，每页条数限制在 1..=MAX_PAGE_SIZE
    pub fn normalized(&self) -> (u64, u64) {
        let page = self.page.clamp(1, MAX_PAGE) as u64;
        let size = self.page_size.clamp(1, MAX_PAGE_SIZE) as u64;
        (page, size)
    }
}

// 分页响应信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationInfo {
    pub fn new(page: u64, page_size: u64, total: u64, total_pages: u64) -> Self {
        Self {
            page: page as i64,
            page_size: page_size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

impl<T> PaginatedResponse<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

// 自定义反序列化函数，支持字符串到i64的转换
fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

/// 可选整数参数，兼容查询字符串中的数字字符串，空字符串视为未提供
pub(crate) fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(v)) => Ok(Some(v)),
        Some(Raw::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Str(s)) => s.trim().parse().map(Some).map_err(Error::custom),
    }
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        let q: PaginationQuery = serde_json::from_str("{}").expect("empty query");
        assert_eq!(q.normalized(), (1, 10));
    }

    #[test]
    fn test_page_size_is_capped() {
        let q: PaginationQuery =
            serde_json::from_str(r#"{"page": "3", "page_size": "100"}"#).expect("query");
        assert_eq!(q.normalized(), (3, 40));
    }

    #[test]
    fn test_size_alias_and_lower_bounds() {
        let q: PaginationQuery =
            serde_json::from_str(r#"{"page": 0, "size": 0}"#).expect("query");
        assert_eq!(q.normalized(), (1, 1));
    }

    #[test]
    fn test_huge_page_is_capped() {
        let (page, size) = PaginationQuery::new(i64::MAX, 100).normalized();
        assert_eq!(page, MAX_PAGE as u64);
        assert!(size.checked_mul(page).is_some());
        assert!((page - 1).checked_mul(size).is_some());
    }

    #[derive(Debug, Deserialize)]
    struct Filter {
        #[serde(flatten)]
        pagination: PaginationQuery,
        #[serde(default, deserialize_with = "deserialize_optional_i64")]
        course_id: Option<i64>,
    }

    #[test]
    fn test_flattened_optional_id_accepts_strings() {
        let f: Filter = serde_json::from_str(r#"{"page": "2", "course_id": "7"}"#).expect("filter");
        assert_eq!(f.course_id, Some(7));
        assert_eq!(f.pagination.normalized(), (2, 10));

        let f: Filter = serde_json::from_str(r#"{"course_id": ""}"#).expect("filter");
        assert_eq!(f.course_id, None);

        let f: Filter = serde_json::from_str("{}").expect("filter");
        assert_eq!(f.course_id, None);
    }

    #[test]
    fn test_non_numeric_is_rejected() {
        assert!(serde_json::from_str::<PaginationQuery>(r#"{"page": "abc"}"#).is_err());
    }
}
