use serde::Serialize;

use super::entities::{Content, ContentKind, Item};

/// 内容及其条目
#[derive(Debug, Clone, Serialize)]
pub struct ContentDetail {
    pub id: i64,
    pub order: i32,
    pub content_type: ContentKind,
    pub item: Item,
}

impl ContentDetail {
    pub fn new(content: Content, item: Item) -> Self {
        Self {
            id: content.id,
            order: content.order,
            content_type: content.content_type,
            item,
        }
    }

    pub fn render(&self) -> String {
        super::render::render_item(&self.item)
    }
}

/// 学生端展示用，条目已渲染为 HTML
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct RenderedContent {
    pub id: i64,
    pub order: i32,
    pub content_type: ContentKind,
    pub title: String,
    pub html: String,
}

impl From<&ContentDetail> for RenderedContent {
    fn from(detail: &ContentDetail) -> Self {
        Self {
            id: detail.id,
            order: detail.order,
            content_type: detail.content_type,
            title: detail.item.title.clone(),
            html: detail.render(),
        }
    }
}
