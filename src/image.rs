//! Image references for `/image`.

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::path::Path;

pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

/// Reads a local image and returns it as a `data:` URL.
pub fn encode_image(path: &str) -> Result<String> {
    let path = Path::new(path);
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(format!(
        "data:{};base64,{}",
        mime_for(path),
        STANDARD.encode(bytes)
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/cat.png"));
        assert!(is_url("http://example.com/cat.png"));
        assert!(!is_url("ftp://example.com/cat.png"));
        assert!(!is_url("./cat.png"));
    }

    #[test]
    fn test_encode_image_png() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("cat.PNG");
        fs::write(&file, b"\x89PNG").unwrap();

        let url = encode_image(&file.to_string_lossy()).unwrap();
        assert_eq!(url, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_encode_image_defaults_to_jpeg() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("photo");
        fs::write(&file, b"abc").unwrap();

        let url = encode_image(&file.to_string_lossy()).unwrap();
        assert_eq!(url, "data:image/jpeg;base64,YWJj");
    }

    #[test]
    fn test_encode_image_missing_file() {
        assert!(encode_image("/definitely/not/here.png").is_err());
    }
}
