use std::sync::{Arc, Mutex};
use std::time::Duration;

use jobboard_engine::{
    EngineEvent, FailureKind, FetchProgress, FetchSettings, Fetcher, ProgressSink, ReqwestFetcher,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

const JOBS: &str = r#"[{"title":"Cook","company":"Diner","location":"NY","description":"Grill"}]"#;

#[tokio::test]
async fn fetcher_returns_json_and_emits_progress() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(JOBS, "application/json"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let sink = TestSink::new();
    let url = format!("{}/jobs", server.uri());

    let body = fetcher.fetch(1, &url, &sink).await.expect("fetch ok");
    assert_eq!(&body[..], JOBS.as_bytes());

    let progress = sink
        .take()
        .into_iter()
        .filter_map(|event| match event {
            EngineEvent::Progress(FetchProgress { generation, bytes }) => Some((generation, bytes)),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(progress.first(), Some(&(1, 0)));
    assert_eq!(progress.last(), Some(&(1, JOBS.len() as u64)));
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let sink = TestSink::new();
    let url = format!("{}/missing", server.uri());

    let err = fetcher.fetch(7, &url, &sink).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn fetcher_rejects_invalid_url() {
    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let sink = TestSink::new();

    let err = fetcher.fetch(1, "not a url", &sink).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("[]"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings);
    let sink = TestSink::new();
    let url = format!("{}/slow", server.uri());

    let err = fetcher.fetch(2, &url, &sink).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/json")
                .set_body_string("[0,1,2,3,4,5,6]"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings);
    let sink = TestSink::new();
    let url = format!("{}/large", server.uri());

    let err = fetcher.fetch(3, &url, &sink).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(15)
        }
    );
}

#[tokio::test]
async fn fetcher_rejects_html_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let sink = TestSink::new();
    let url = format!("{}/page", server.uri());

    let err = fetcher.fetch(4, &url, &sink).await.unwrap_err();
    match err.kind {
        FailureKind::UnsupportedContentType { content_type } => {
            assert!(content_type.starts_with("text/html"));
        }
        other => panic!("unexpected failure: {other}"),
    }
}

#[tokio::test]
async fn fetcher_stops_after_redirect_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        redirect_limit: 2,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings);
    let sink = TestSink::new();
    let url = format!("{}/loop", server.uri());

    let err = fetcher.fetch(6, &url, &sink).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::RedirectLimitExceeded);
    assert!(sink.take().is_empty());
}
