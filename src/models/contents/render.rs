//! 内容条目渲染为 HTML 片段
//!
//! 所有用户输入都经过转义；视频链接中的 YouTube 地址转换为嵌入播放器。

use once_cell::sync::Lazy;
use regex::Regex;

use super::entities::{Item, ItemBody};

static YOUTUBE_WATCH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(?:www\.|m\.)?youtube\.com/watch\?(?:.*&)?v=([A-Za-z0-9_-]{6,})")
        .expect("Invalid youtube watch regex")
});

static YOUTUBE_SHORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://youtu\.be/([A-Za-z0-9_-]{6,})").expect("Invalid youtube short regex")
});

/// 文件下载地址
pub fn download_url(token: &str) -> String {
    format!("/api/v1/files/download/{}", escape_html(token))
}

pub fn render_item(item: &Item) -> String {
    match &item.body {
        ItemBody::Text { content } => render_text(content),
        ItemBody::File { file } => format!(
            r#"<p><a href="{}" download>{}</a></p>"#,
            download_url(file),
            escape_html(&item.title)
        ),
        ItemBody::Image { file } => format!(
            r#"<p><img src="{}" alt="{}"></p>"#,
            download_url(file),
            escape_html(&item.title)
        ),
        ItemBody::Video { url } => render_video(url),
    }
}

/// 空行分段，段内换行转为 `<br>`
fn render_text(content: &str) -> String {
    let normalized = content.replace("\r\n", "\n");
    normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            let lines: Vec<String> = p.lines().map(escape_html).collect();
            format!("<p>{}</p>", lines.join("<br>"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_video(url: &str) -> String {
    match youtube_video_id(url) {
        Some(id) => format!(
            r#"<iframe width="560" height="315" src="https://www.youtube.com/embed/{id}" frameborder="0" allowfullscreen></iframe>"#
        ),
        None => format!(
            r#"<video controls src="{}"></video>"#,
            escape_html(url)
        ),
    }
}

pub fn youtube_video_id(url: &str) -> Option<&str> {
    YOUTUBE_WATCH_RE
        .captures(url)
        .or_else(|| YOUTUBE_SHORT_RE.captures(url))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, body: ItemBody) -> Item {
        let now = chrono::Utc::now();
        Item {
            id: 1,
            owner_id: 1,
            title: title.into(),
            body,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_text_paragraphs_and_breaks() {
        let html = render_item(&item(
            "t",
            ItemBody::Text {
                content: "line one\nline <two>\n\nsecond & last".into(),
            },
        ));
        assert_eq!(
            html,
            "<p>line one<br>line &lt;two&gt;</p>\n<p>second &amp; last</p>"
        );
    }

    #[test]
    fn test_image_escapes_title() {
        let html = render_item(&item(
            r#"a "quoted" <b>"#,
            ItemBody::Image {
                file: "abc-123".into(),
            },
        ));
        assert_eq!(
            html,
            r#"<p><img src="/api/v1/files/download/abc-123" alt="a &quot;quoted&quot; &lt;b&gt;"></p>"#
        );
    }

    #[test]
    fn test_file_link() {
        let html = render_item(&item(
            "Slides",
            ItemBody::File {
                file: "tok".into(),
            },
        ));
        assert!(html.contains(r#"href="/api/v1/files/download/tok""#));
        assert!(html.contains(">Slides</a>"));
    }

    #[test]
    fn test_youtube_urls_become_embeds() {
        assert_eq!(
            youtube_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            youtube_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(youtube_video_id("https://youtu.be/dQw4w9WgXcQ"), Some("dQw4w9WgXcQ"));
        let html = render_item(&item(
            "v",
            ItemBody::Video {
                url: "https://youtu.be/dQw4w9WgXcQ".into(),
            },
        ));
        assert!(html.contains("https://www.youtube.com/embed/dQw4w9WgXcQ"));
    }

    #[test]
    fn test_other_video_urls_use_video_tag() {
        let html = render_item(&item(
            "v",
            ItemBody::Video {
                url: "https://cdn.example.com/a.mp4?x=1&y=2".into(),
            },
        ));
        assert_eq!(
            html,
            r#"<video controls src="https://cdn.example.com/a.mp4?x=1&amp;y=2"></video>"#
        );
        assert_eq!(youtube_video_id("https://vimeo.com/123456"), None);
    }
}
