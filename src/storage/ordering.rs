//! 排序字段
//!
//! 模块在课程内、内容在模块内各自维护一个从 0 开始递增的 `order`。

/// 父级范围内的下一个序号：空范围为 0，否则为当前最大值加一
pub fn next_order(last: Option<i32>) -> i32 {
    match last {
        Some(max) => max.saturating_add(1),
        None => 0,
    }
}

/// 调用方显式给出的序号优先
pub fn resolve_order(explicit: Option<i32>, last: Option<i32>) -> i32 {
    explicit.unwrap_or_else(|| next_order(last))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scope_starts_at_zero() {
        assert_eq!(next_order(None), 0);
    }

    #[test]
    fn test_follows_current_max() {
        assert_eq!(next_order(Some(0)), 1);
        assert_eq!(next_order(Some(7)), 8);
    }

    #[test]
    fn test_explicit_order_is_kept() {
        assert_eq!(resolve_order(Some(3), Some(10)), 3);
        assert_eq!(resolve_order(None, Some(10)), 11);
        assert_eq!(resolve_order(None, None), 0);
    }
}
