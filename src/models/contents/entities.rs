use serde::{Deserialize, Serialize};

/// 内容条目类型，对应 texts / files / images / videos 四张表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text,
    File,
    Image,
    Video,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Text,
        ContentKind::File,
        ContentKind::Image,
        ContentKind::Video,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::File => "file",
            ContentKind::Image => "image",
            ContentKind::Video => "video",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ContentKind::Text),
            "file" => Ok(ContentKind::File),
            "image" => Ok(ContentKind::Image),
            "video" => Ok(ContentKind::Video),
            _ => Err(format!("Unknown content type: {s}")),
        }
    }
}

/// 模块中的一条内容，通过 (content_type, object_id) 指向具体条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub id: i64,
    pub module_id: i64,
    pub content_type: ContentKind,
    pub object_id: i64,
    pub order: i32,
}

/// 各类型条目的负载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemBody {
    Text { content: String },
    /// `file` 为上传 token
    File { file: String },
    Image { file: String },
    Video { url: String },
}

impl ItemBody {
    pub fn kind(&self) -> ContentKind {
        match self {
            ItemBody::Text { .. } => ContentKind::Text,
            ItemBody::File { .. } => ContentKind::File,
            ItemBody::Image { .. } => ContentKind::Image,
            ItemBody::Video { .. } => ContentKind::Video,
        }
    }

    /// 引用的上传 token（仅 file / image）
    pub fn upload_token(&self) -> Option<&str> {
        match self {
            ItemBody::File { file } | ItemBody::Image { file } => Some(file),
            _ => None,
        }
    }
}

/// 内容条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    #[serde(flatten)]
    pub body: ItemBody,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_and_display() {
        for kind in ContentKind::ALL {
            assert_eq!(kind.to_string().parse::<ContentKind>(), Ok(kind));
        }
        assert!("audio".parse::<ContentKind>().is_err());
    }

    #[test]
    fn test_item_serializes_flat() {
        let now = chrono::Utc::now();
        let item = Item {
            id: 7,
            owner_id: 2,
            title: "Intro".into(),
            body: ItemBody::Video {
                url: "https://youtu.be/abc".into(),
            },
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&item).expect("serialize");
        assert_eq!(value["kind"], "video");
        assert_eq!(value["url"], "https://youtu.be/abc");
        assert_eq!(item.body.kind(), ContentKind::Video);
        assert_eq!(item.body.upload_token(), None);
    }
}
