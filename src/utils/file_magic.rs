//! 上传文件类型校验
//!
//! 只接受白名单扩展名，并要求文件头与扩展名一致。

pub const INVALID_FILE_TYPE_MESSAGE: &str =
    "Invalid file type. Only PDF, DOC, DOCX, TXT, JPG, JPEG, and PNG files are allowed.";

/// 从文件名取出小写扩展名（含点号）
pub fn file_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_lowercase()))
}

/// 验证文件内容的魔术字节是否与扩展名匹配
///
/// `extension` 含点号，如 ".png"。文本文件不检查文件头，空内容一律拒绝。
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        ".png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        ".jpg" | ".jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        ".pdf" => data.starts_with(b"%PDF"),
        // OLE Compound Document
        ".doc" => data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]),
        // OOXML (zip)
        ".docx" => data.starts_with(&[0x50, 0x4B, 0x03, 0x04]),
        ".txt" => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("report.PDF").as_deref(), Some(".pdf"));
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some(".gz"));
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension(".env"), None);
    }

    #[test]
    fn test_allowed_types() {
        assert!(validate_magic_bytes(b"%PDF-1.7", ".pdf"));
        assert!(validate_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0], ".jpeg"));
        assert!(validate_magic_bytes(&[0x50, 0x4B, 0x03, 0x04, 0x14], ".docx"));
        assert!(validate_magic_bytes(b"plain notes", ".txt"));
    }

    #[test]
    fn test_mismatched_header() {
        assert!(!validate_magic_bytes(b"%PDF-1.7", ".png"));
        assert!(!validate_magic_bytes(b"MZ\x90\x00", ".doc"));
    }

    #[test]
    fn test_rejected_types() {
        assert!(!validate_magic_bytes(&[0x50, 0x4B, 0x03, 0x04], ".zip"));
        assert!(!validate_magic_bytes(b"GIF89a", ".gif"));
        assert!(!validate_magic_bytes(&[], ".txt"));
    }
}
