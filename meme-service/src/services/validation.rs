/// Post validation
///
/// Field checks run in a fixed order and the first failure wins. The image
/// check is a live HTTP probe: the url must answer a GET with a 2xx status
/// and an allowed image content type within a bounded timeout.
use crate::error::{AppError, Result};
use crate::models::{PostDraft, PostUpdate};
use std::sync::Arc;
use std::time::Duration;

/// Content types accepted for post images.
const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

/// Outbound reachability probe for image urls.
///
/// The probe is deliberately boolean: any transport failure, timeout, or
/// unexpected response reads as "not an image" rather than an error, so a
/// flaky remote can only reject a post, never fail the request pipeline.
#[async_trait::async_trait]
pub trait ImageUrlProbe: Send + Sync {
    async fn is_image_url(&self, url: &str) -> bool;
}

/// Probe backed by a real HTTP GET.
pub struct HttpImageUrlProbe {
    client: reqwest::Client,
}

impl HttpImageUrlProbe {
    /// Build a probe whose requests never outlive `timeout`.
    pub fn new(timeout: Duration) -> Self {
        // Built once at startup; reqwest::Client::new() panics on the same
        // construction failures.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client for image probe");

        Self { client }
    }
}

#[async_trait::async_trait]
impl ImageUrlProbe for HttpImageUrlProbe {
    async fn is_image_url(&self, url: &str) -> bool {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(%url, "image probe request failed: {}", err);
                return false;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(%url, status = %response.status(), "image probe got non-2xx");
            return false;
        }

        let content_type = match response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        {
            Some(value) => value,
            None => return false,
        };

        match content_type.parse::<mime::Mime>() {
            // essence_str drops parameters like `; charset=...` and is
            // already lowercased.
            Ok(mime) => ALLOWED_IMAGE_TYPES.contains(&mime.essence_str()),
            Err(_) => false,
        }
    }
}

/// Field validation for candidate posts and partial updates.
pub struct PostValidator {
    probe: Arc<dyn ImageUrlProbe>,
}

impl PostValidator {
    pub fn new(probe: Arc<dyn ImageUrlProbe>) -> Self {
        Self { probe }
    }

    /// Validate a creation candidate.
    pub async fn validate_draft(&self, draft: &PostDraft) -> Result<()> {
        let name = draft.name.as_deref().unwrap_or("");
        if name.trim().is_empty() {
            return Err(AppError::ValidationError("name cannot be empty".to_string()));
        }

        let url = draft.url.as_deref().unwrap_or("");
        if url.trim().is_empty() {
            return Err(AppError::ValidationError("url cannot be empty".to_string()));
        }

        let caption = draft.caption.as_deref().unwrap_or("");
        if caption.trim().is_empty() {
            return Err(AppError::ValidationError(
                "caption cannot be empty".to_string(),
            ));
        }

        if !self.probe.is_image_url(url).await {
            return Err(AppError::ValidationError(
                "url is not a valid image url".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate a partial update. Only present fields are checked; absent
    /// fields are untouched and therefore unvalidated.
    pub async fn validate_update(&self, update: &PostUpdate) -> Result<()> {
        if let Some(url) = update.url.as_deref() {
            if !self.probe.is_image_url(url).await {
                return Err(AppError::ValidationError(
                    "url is not a valid image url".to_string(),
                ));
            }
        }

        if let Some(caption) = update.caption.as_deref() {
            if caption.trim().is_empty() {
                return Err(AppError::ValidationError(
                    "caption cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Probe that answers from a fixed verdict, no network involved.
    struct StubProbe {
        accepts: bool,
    }

    #[async_trait::async_trait]
    impl ImageUrlProbe for StubProbe {
        async fn is_image_url(&self, _url: &str) -> bool {
            self.accepts
        }
    }

    fn validator(accepts: bool) -> PostValidator {
        PostValidator::new(Arc::new(StubProbe { accepts }))
    }

    fn draft(name: &str, url: &str, caption: &str) -> PostDraft {
        PostDraft {
            name: Some(name.to_string()),
            url: Some(url.to_string()),
            caption: Some(caption.to_string()),
        }
    }

    fn reason(result: crate::error::Result<()>) -> String {
        match result {
            Err(AppError::ValidationError(reason)) => reason,
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_and_blank_name_rejected() {
        let validator = validator(true);

        let missing = PostDraft {
            name: None,
            url: Some("http://x/img.png".to_string()),
            caption: Some("c".to_string()),
        };
        assert_eq!(
            reason(validator.validate_draft(&missing).await),
            "name cannot be empty"
        );

        let blank = draft("   ", "http://x/img.png", "c");
        assert_eq!(
            reason(validator.validate_draft(&blank).await),
            "name cannot be empty"
        );
    }

    #[tokio::test]
    async fn test_field_checks_run_in_order() {
        // Everything is blank; the name check fires first.
        let validator = validator(true);
        let empty = PostDraft::default();
        assert_eq!(
            reason(validator.validate_draft(&empty).await),
            "name cannot be empty"
        );

        // Name present, url blank: url check fires before caption.
        let no_url = PostDraft {
            name: Some("A".to_string()),
            url: None,
            caption: None,
        };
        assert_eq!(
            reason(validator.validate_draft(&no_url).await),
            "url cannot be empty"
        );

        let no_caption = PostDraft {
            name: Some("A".to_string()),
            url: Some("http://x/img.png".to_string()),
            caption: Some("".to_string()),
        };
        assert_eq!(
            reason(validator.validate_draft(&no_caption).await),
            "caption cannot be empty"
        );
    }

    #[tokio::test]
    async fn test_probe_verdict_decides_url_validity() {
        let accepted = validator(true)
            .validate_draft(&draft("A", "http://x/img.png", "c"))
            .await;
        assert!(accepted.is_ok());

        let rejected = validator(false)
            .validate_draft(&draft("A", "http://x/img.png", "c"))
            .await;
        assert_eq!(reason(rejected), "url is not a valid image url");
    }

    #[tokio::test]
    async fn test_update_with_no_fields_is_a_noop() {
        let validator = validator(false);
        assert!(validator.validate_update(&PostUpdate::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_checks_only_present_fields() {
        let accepting = validator(true);

        let caption_only = PostUpdate {
            url: None,
            caption: Some("  ".to_string()),
        };
        assert_eq!(
            reason(accepting.validate_update(&caption_only).await),
            "caption cannot be empty"
        );

        let url_only = PostUpdate {
            url: Some("http://x/img.png".to_string()),
            caption: None,
        };
        assert!(accepting.validate_update(&url_only).await.is_ok());

        let bad_url = PostUpdate {
            url: Some("http://x/page.html".to_string()),
            caption: Some("fine".to_string()),
        };
        assert_eq!(
            reason(validator(false).validate_update(&bad_url).await),
            "url is not a valid image url"
        );
    }

    /// Serve a single canned HTTP response on an ephemeral port.
    async fn one_shot_server(response: &'static str) -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            use tokio::io::{AsyncReadExt, AsyncWriteExt};

            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        addr
    }

    #[tokio::test]
    async fn test_http_probe_accepts_an_image_response() {
        let addr = one_shot_server(
            "HTTP/1.1 200 OK\r\ncontent-type: image/png\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;

        let probe = HttpImageUrlProbe::new(Duration::from_secs(2));
        assert!(probe.is_image_url(&format!("http://{}/img.png", addr)).await);
    }

    #[tokio::test]
    async fn test_http_probe_rejects_non_image_content_type() {
        let addr = one_shot_server(
            "HTTP/1.1 200 OK\r\ncontent-type: text/html\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;

        let probe = HttpImageUrlProbe::new(Duration::from_secs(2));
        assert!(!probe.is_image_url(&format!("http://{}/page", addr)).await);
    }

    #[tokio::test]
    async fn test_http_probe_rejects_non_2xx_even_with_image_content_type() {
        let addr = one_shot_server(
            "HTTP/1.1 404 Not Found\r\ncontent-type: image/png\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;

        let probe = HttpImageUrlProbe::new(Duration::from_secs(2));
        assert!(!probe.is_image_url(&format!("http://{}/gone.png", addr)).await);
    }

    #[tokio::test]
    async fn test_http_probe_treats_transport_errors_as_invalid() {
        // Bind then drop to get a port nothing is listening on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let probe = HttpImageUrlProbe::new(Duration::from_secs(2));
        assert!(!probe.is_image_url(&format!("http://{}/img.png", addr)).await);
        assert!(!probe.is_image_url("not a url at all").await);
    }

    #[tokio::test]
    async fn test_http_probe_timeout_is_bounded() {
        // Accept the connection but never answer.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((socket, _)) = listener.accept().await {
                tokio::time::sleep(Duration::from_secs(30)).await;
                drop(socket);
            }
        });

        let probe = HttpImageUrlProbe::new(Duration::from_millis(300));
        let start = std::time::Instant::now();
        assert!(!probe.is_image_url(&format!("http://{}/slow.png", addr)).await);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_allowed_types_cover_the_three_image_formats() {
        for content_type in ["image/jpeg", "image/jpg", "image/png"] {
            let mime: mime::Mime = content_type.parse().unwrap();
            assert!(ALLOWED_IMAGE_TYPES.contains(&mime.essence_str()));
        }

        let gif: mime::Mime = "image/gif".parse().unwrap();
        assert!(!ALLOWED_IMAGE_TYPES.contains(&gif.essence_str()));

        // Parameters and casing are normalized away by the mime crate.
        let upper: mime::Mime = "IMAGE/PNG; charset=utf-8".parse().unwrap();
        assert!(ALLOWED_IMAGE_TYPES.contains(&upper.essence_str()));
    }
}
