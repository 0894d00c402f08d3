//! 上传文件的内容嗅探
//!
//! 扩展名只决定"应该是什么"，文件头决定"是不是"。两者一致时返回记录用的 MIME 类型，
//! 客户端自报的 Content-Type 不参与判断。

const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];
const ZIP: &[u8] = &[0x50, 0x4B, 0x03, 0x04];

/// 根据扩展名（含点号）和文件开头的字节确定 MIME 类型，不匹配时返回 None
pub fn sniff_mime_type(head: &[u8], extension: &str) -> Option<&'static str> {
    if head.is_empty() {
        return None;
    }

    let ext = extension.to_ascii_lowercase();
    let (mime, matches) = match ext.as_str() {
        ".png" => ("image/png", head.starts_with(PNG)),
        ".jpg" | ".jpeg" => ("image/jpeg", head.starts_with(JPEG)),
        ".gif" => (
            "image/gif",
            head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a"),
        ),
        ".webp" => (
            "image/webp",
            head.len() >= 12 && &head[0..4] == b"RIFF" && &head[8..12] == b"WEBP",
        ),
        ".pdf" => ("application/pdf", head.starts_with(b"%PDF")),
        ".zip" => ("application/zip", head.starts_with(ZIP)),
        // OOXML 本质是 zip 包
        ".docx" => (
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            head.starts_with(ZIP),
        ),
        ".pptx" => (
            "application/vnd.openxmlformats-officedocument.presentationml.presentation",
            head.starts_with(ZIP),
        ),
        ".xlsx" => (
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            head.starts_with(ZIP),
        ),
        ".txt" => ("text/plain", looks_like_text(head)),
        ".md" => ("text/markdown", looks_like_text(head)),
        _ => return None,
    };

    matches.then_some(mime)
}

/// UTF-8 且不含 NUL；结尾被截断的多字节字符不算错误
fn looks_like_text(head: &[u8]) -> bool {
    if head.contains(&0) {
        return false;
    }
    match std::str::from_utf8(head) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_images_are_sniffed() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        assert_eq!(sniff_mime_type(&png, ".PNG"), Some("image/png"));
        assert_eq!(sniff_mime_type(&png, ".jpg"), None);
        assert_eq!(
            sniff_mime_type(&[0xFF, 0xD8, 0xFF, 0xE0], ".jpeg"),
            Some("image/jpeg")
        );
        assert_eq!(sniff_mime_type(b"RIFF\x10\x00\x00\x00WEBPVP8 ", ".webp"), Some("image/webp"));
    }

    #[test]
    fn test_office_documents_are_zip_based() {
        let zip = [0x50, 0x4B, 0x03, 0x04, 0x14];
        assert!(sniff_mime_type(&zip, ".docx").is_some());
        assert_eq!(sniff_mime_type(&zip, ".zip"), Some("application/zip"));
        assert_eq!(sniff_mime_type(b"%PDF-1.7", ".docx"), None);
    }

    #[test]
    fn test_text_must_be_utf8() {
        assert_eq!(sniff_mime_type("héllo".as_bytes(), ".txt"), Some("text/plain"));
        // 多字节字符在分块边界被截断
        let cut = &"hé".as_bytes()[..2];
        assert_eq!(sniff_mime_type(cut, ".md"), Some("text/markdown"));
        assert_eq!(sniff_mime_type(&[0x68, 0x00, 0x69], ".txt"), None);
        assert_eq!(sniff_mime_type(&[0xFF, 0xFE, 0x41], ".txt"), None);
    }

    #[test]
    fn test_empty_or_unknown_is_rejected() {
        assert_eq!(sniff_mime_type(&[], ".png"), None);
        assert_eq!(sniff_mime_type(b"MZ\x90\x00", ".exe"), None);
    }
}
