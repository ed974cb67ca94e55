//! Image source resolution shared by the chat and vision services.
//!
//! An image reference is one of three things: an inline `data:` URI, a
//! remote http(s) URL, or a local file path. Local paths are read, base64
//! encoded and rewritten to data URIs before transmission.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::path::Path;
use url::Url;

use crate::errors::{GroqError, GroqResult};

/// True for inline `data:` URIs, which are passed through untouched.
pub(crate) fn is_data_uri(source: &str) -> bool {
    source.starts_with("data:")
}

/// True for parseable remote http(s) URLs.
pub(crate) fn is_remote_url(source: &str) -> bool {
    Url::parse(source)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Sniffs the image MIME type from the file extension.
pub(crate) fn mime_for_path(path: &Path) -> mime::Mime {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();

    match ext.as_str() {
        "png" => mime::IMAGE_PNG,
        "gif" => mime::IMAGE_GIF,
        "bmp" => mime::IMAGE_BMP,
        "webp" => "image/webp".parse().unwrap_or(mime::IMAGE_JPEG),
        _ => mime::IMAGE_JPEG,
    }
}

/// Reads a local image and encodes it as a `data:<mime>;base64,...` URI.
///
/// When `max_bytes` is set, files over the limit are rejected locally
/// before any encoding work.
pub(crate) async fn file_to_data_uri(
    path: &Path,
    max_bytes: Option<u64>,
) -> GroqResult<String> {
    if !path.exists() {
        return Err(GroqError::not_found(format!(
            "Image file not found: {}",
            path.display()
        )));
    }

    if let Some(limit) = max_bytes {
        let size = tokio::fs::metadata(path).await?.len();
        if size > limit {
            return Err(GroqError::validation(format!(
                "Image file exceeds maximum size of {limit} bytes: {} bytes",
                size
            )));
        }
    }

    let data = tokio::fs::read(path).await?;
    Ok(format!(
        "data:{};base64,{}",
        mime_for_path(path),
        BASE64.encode(&data)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_data_uris_and_remote_urls() {
        assert!(is_data_uri("data:image/png;base64,AAAA"));
        assert!(!is_data_uri("https://example.com/a.png"));

        assert!(is_remote_url("https://example.com/a.png"));
        assert!(is_remote_url("http://example.com/a.png"));
        assert!(!is_remote_url("/tmp/a.png"));
        assert!(!is_remote_url("relative/a.png"));
        assert!(!is_remote_url("file:///tmp/a.png"));
    }

    #[test]
    fn mime_sniffing_by_extension() {
        assert_eq!(mime_for_path(Path::new("a.png")), mime::IMAGE_PNG);
        assert_eq!(mime_for_path(Path::new("a.GIF")), mime::IMAGE_GIF);
        assert_eq!(mime_for_path(Path::new("a.jpg")), mime::IMAGE_JPEG);
        assert_eq!(mime_for_path(Path::new("a.jpeg")), mime::IMAGE_JPEG);
        assert_eq!(mime_for_path(Path::new("noext")), mime::IMAGE_JPEG);
    }

    #[tokio::test]
    async fn encodes_local_file_round_trip() {
        use base64::Engine as _;

        let dir = std::env::temp_dir().join("groq_sdk_images_test");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("pixel.png");
        let payload = b"\x89PNG\r\n\x1a\nfakepixels".to_vec();
        tokio::fs::write(&path, &payload).await.unwrap();

        let uri = file_to_data_uri(&path, None).await.unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));

        let encoded = uri.rsplit(',').next().unwrap();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        assert_eq!(decoded, payload);
    }

    #[tokio::test]
    async fn rejects_oversized_file() {
        let dir = std::env::temp_dir().join("groq_sdk_images_test");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("big.jpg");
        tokio::fs::write(&path, vec![0u8; 32]).await.unwrap();

        let err = file_to_data_uri(&path, Some(16)).await.unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::ValidationError);

        // Exactly at the limit passes.
        assert!(file_to_data_uri(&path, Some(32)).await.is_ok());
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let err = file_to_data_uri(Path::new("/no/such/image.png"), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::NotFoundError);
    }
}
