use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use studio_engine::{
    fetch_with_retry, FailureKind, FetchError, FetchSettings, ReqwestThumbnailFetcher,
    ThumbnailAsset, ThumbnailFetcher,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetcher_returns_image_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/seed/42/800/450"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0xFF, 0xD8, 0xFF], "image/jpeg"))
        .mount(&server)
        .await;

    let fetcher = ReqwestThumbnailFetcher::new(FetchSettings::default());
    let url = format!("{}/seed/42/800/450", server.uri());

    let asset = fetcher.fetch(&url).await.expect("fetch ok");
    assert_eq!(&asset.bytes[..], &[0xFF, 0xD8, 0xFF]);
    assert_eq!(asset.content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(asset.final_url, url);
}

#[tokio::test]
async fn fetcher_follows_redirect_to_cdn() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/seed/1/800/450"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("{}/id/237/800/450.jpg", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/id/237/800/450.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![1, 2, 3, 4], "image/jpeg"))
        .mount(&server)
        .await;

    let fetcher = ReqwestThumbnailFetcher::new(FetchSettings::default());
    let asset = fetcher
        .fetch(&format!("{}/seed/1/800/450", server.uri()))
        .await
        .expect("redirected fetch ok");

    assert_eq!(asset.bytes.len(), 4);
    assert!(asset.final_url.ends_with("/id/237/800/450.jpg"));
}

#[tokio::test]
async fn fetcher_rejects_non_image_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let fetcher = ReqwestThumbnailFetcher::new(FetchSettings::default());
    let err = fetcher
        .fetch(&format!("{}/page", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "text/html".to_string()
        }
    );
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ReqwestThumbnailFetcher::new(FetchSettings::default());
    let err = fetcher
        .fetch(&format!("{}/missing", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw(vec![0u8; 8], "image/png"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = ReqwestThumbnailFetcher::new(settings);
    let err = fetcher
        .fetch(&format!("{}/slow", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_image() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![7u8; 11], "image/jpeg"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestThumbnailFetcher::new(settings);
    let err = fetcher
        .fetch(&format!("{}/large", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn server_error_is_retried_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![9u8; 3], "image/jpeg"))
        .mount(&server)
        .await;

    let fetcher = ReqwestThumbnailFetcher::new(FetchSettings::default());
    let asset = fetch_with_retry(&fetcher, &format!("{}/flaky", server.uri()), 1)
        .await
        .expect("second attempt succeeds");
    assert_eq!(asset.bytes.len(), 3);
}

struct CountingFetcher {
    calls: AtomicU32,
    kind: FailureKind,
}

#[async_trait::async_trait]
impl ThumbnailFetcher for CountingFetcher {
    async fn fetch(&self, _url: &str) -> Result<ThumbnailAsset, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(FetchError {
            kind: self.kind.clone(),
            message: "boom".to_string(),
        })
    }
}

#[tokio::test]
async fn retry_gives_up_after_one_extra_attempt() {
    let fetcher = CountingFetcher {
        calls: AtomicU32::new(0),
        kind: FailureKind::Network,
    };
    let err = fetch_with_retry(&fetcher, "http://unused", 1).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn permanent_failures_are_not_retried() {
    let fetcher = CountingFetcher {
        calls: AtomicU32::new(0),
        kind: FailureKind::InvalidUrl,
    };
    let _ = fetch_with_retry(&fetcher, "http://unused", 1).await;
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}
