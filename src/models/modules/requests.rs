use serde::Deserialize;
use std::collections::HashMap;

/// 新建模块（存储层）
#[derive(Debug, Clone)]
pub struct NewModule {
    pub course_id: i64,
    pub title: String,
    pub description: String,
    /// 为空时按排序规则追加到末尾
    pub order: Option<i32>,
}

/// 模块表单集中的一项
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleFormEntry {
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// 新模块的显式序号，为空时追加到末尾
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub delete: bool,
}

impl ModuleFormEntry {
    /// 未填写的额外空表单
    pub fn is_blank_extra(&self) -> bool {
        self.id.is_none() && self.title.trim().is_empty() && self.description.trim().is_empty()
    }
}

/// 表单集校验通过后的写入计划
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleFormsetPlan {
    /// (title, description, order)，按提交顺序追加
    pub creates: Vec<(String, String, Option<i32>)>,
    /// (id, title, description)
    pub updates: Vec<(i64, String, String)>,
    pub deletes: Vec<i64>,
}

/// 排序请求体：`{"<id>": <order>, ...}`
pub type OrderRequest = HashMap<String, i32>;

/// 解析排序请求，无法解析的 id 直接忽略，结果按 id 排序；序号不能为负
pub fn parse_order_request(request: &OrderRequest) -> Result<Vec<(i64, i32)>, String> {
    let mut pairs = Vec::with_capacity(request.len());
    for (id, order) in request {
        let Ok(id) = id.trim().parse::<i64>() else {
            continue;
        };
        if *order < 0 {
            return Err(format!("Order of {id} must not be negative"));
        }
        pairs.push((id, *order));
    }
    pairs.sort_unstable();
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order_request_skips_bad_ids() {
        let request: OrderRequest =
            serde_json::from_str(r#"{"3": 0, "1": 2, "abc": 5, " 2 ": 1}"#).expect("order map");
        assert_eq!(
            parse_order_request(&request).expect("valid orders"),
            vec![(1, 2), (2, 1), (3, 0)]
        );
    }

    #[test]
    fn test_parse_order_request_rejects_negative_order() {
        let request: OrderRequest =
            serde_json::from_str(r#"{"1": 0, "2": -5}"#).expect("order map");
        let message = parse_order_request(&request).expect_err("negative order");
        assert!(message.contains('2'));
    }

    #[test]
    fn test_blank_extra_form() {
        assert!(ModuleFormEntry::default().is_blank_extra());
        let existing = ModuleFormEntry {
            id: Some(4),
            ..Default::default()
        };
        assert!(!existing.is_blank_extra());
        let filled = ModuleFormEntry {
            title: "Intro".into(),
            ..Default::default()
        };
        assert!(!filled.is_blank_extra());
    }
}
