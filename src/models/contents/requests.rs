use serde::Deserialize;

use super::entities::{ContentKind, ItemBody};

/// 条目标题最大长度
pub const ITEM_TITLE_MAX_LEN: usize = 250;

/// 创建 / 更新条目请求，按类型取对应字段
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemRequest {
    pub title: String,
    pub content: Option<String>,
    pub file: Option<String>,
    pub url: Option<String>,
}

impl ItemRequest {
    /// 校验并转换为指定类型的负载
    pub fn into_body(self, kind: ContentKind) -> Result<(String, ItemBody), String> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err("Title is required".to_string());
        }
        if title.chars().count() > ITEM_TITLE_MAX_LEN {
            return Err(format!(
                "Title must be at most {ITEM_TITLE_MAX_LEN} characters"
            ));
        }

        let body = match kind {
            ContentKind::Text => ItemBody::Text {
                content: required(self.content, "content")?,
            },
            ContentKind::File => ItemBody::File {
                file: required(self.file, "file")?,
            },
            ContentKind::Image => ItemBody::Image {
                file: required(self.file, "file")?,
            },
            ContentKind::Video => {
                let url = required(self.url, "url")?;
                crate::utils::validate::validate_http_url(&url)?;
                ItemBody::Video { url }
            }
        };
        Ok((title, body))
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(format!("Field '{field}' is required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str) -> ItemRequest {
        ItemRequest {
            title: title.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_text_requires_content() {
        assert!(request("Intro").into_body(ContentKind::Text).is_err());
        let ok = ItemRequest {
            content: Some("Hello".into()),
            ..request(" Intro ")
        }
        .into_body(ContentKind::Text)
        .expect("valid text");
        assert_eq!(ok.0, "Intro");
        assert_eq!(
            ok.1,
            ItemBody::Text {
                content: "Hello".into()
            }
        );
    }

    #[test]
    fn test_video_url_must_be_http() {
        let bad = ItemRequest {
            url: Some("javascript:alert(1)".into()),
            ..request("Clip")
        };
        assert!(bad.into_body(ContentKind::Video).is_err());

        let good = ItemRequest {
            url: Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ".into()),
            ..request("Clip")
        };
        assert!(good.into_body(ContentKind::Video).is_ok());
    }

    #[test]
    fn test_blank_title_rejected() {
        let req = ItemRequest {
            file: Some("token".into()),
            ..request("   ")
        };
        assert!(req.into_body(ContentKind::File).is_err());
    }
}
