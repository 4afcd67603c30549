use std::sync::{Arc, Mutex};

use idea_engine::{
    EngineEvent, FailureKind, FragmentSink, FragmentSource, ReqwestFragmentSource, StreamSettings,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{header, method, path};
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

impl FragmentSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

async fn serve(route: &str, template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn source_delivers_message_payloads_in_order() {
    let body = ": ping\n\ndata: # Title\n\ndata: - item one\n\nevent: meta\ndata: skipped\n\ndata: \n\ndata: - item two\n\n";
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stream"))
        .and(header("accept", "text/event-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let source = ReqwestFragmentSource::new(StreamSettings::default());
    let sink = TestSink::new();
    let url = format!("{}/stream", server.uri());

    let summary = source.stream(4, &url, &sink).await.expect("stream ok");
    assert_eq!(summary.fragments, 4);
    assert_eq!(summary.bytes, body.len() as u64);

    let fragment = |text: &str| EngineEvent::Fragment {
        connection: 4,
        text: text.to_string(),
    };
    assert_eq!(
        sink.take(),
        vec![
            EngineEvent::Opened { connection: 4 },
            fragment("# Title"),
            fragment("- item one"),
            fragment(""),
            fragment("- item two"),
        ]
    );
}

#[tokio::test]
async fn source_accepts_content_type_parameters() {
    let server = serve(
        "/stream",
        ResponseTemplate::new(200).set_body_raw("data: ok\n\n", "text/event-stream; charset=utf-8"),
    )
    .await;

    let source = ReqwestFragmentSource::new(StreamSettings::default());
    let sink = TestSink::new();
    let summary = source
        .stream(1, &format!("{}/stream", server.uri()), &sink)
        .await
        .expect("stream ok");
    assert_eq!(summary.fragments, 1);
}

#[tokio::test]
async fn source_fails_on_http_status() {
    let server = serve("/stream", ResponseTemplate::new(404)).await;

    let source = ReqwestFragmentSource::new(StreamSettings::default());
    let sink = TestSink::new();
    let url = format!("{}/stream", server.uri());

    let err = source.stream(7, &url, &sink).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn source_rejects_non_event_stream() {
    let server = serve(
        "/stream",
        ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"),
    )
    .await;

    let source = ReqwestFragmentSource::new(StreamSettings::default());
    let sink = TestSink::new();
    let url = format!("{}/stream", server.uri());

    let err = source.stream(2, &url, &sink).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "text/html".to_string()
        }
    );
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn source_rejects_missing_content_type() {
    let server = serve("/stream", ResponseTemplate::new(200)).await;

    let source = ReqwestFragmentSource::new(StreamSettings::default());
    let sink = TestSink::new();
    let url = format!("{}/stream", server.uri());

    let err = source.stream(3, &url, &sink).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: String::new()
        }
    );
}

#[tokio::test]
async fn source_rejects_invalid_url() {
    let source = ReqwestFragmentSource::new(StreamSettings::default());
    let sink = TestSink::new();

    let err = source.stream(5, "not a url", &sink).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
