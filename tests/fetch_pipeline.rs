//! Integration tests for the fetch pipeline
//!
//! These tests run real exchanges against a local wiremock server and verify:
//! - Redirect following and the final URL
//! - Sniffing, classification and charset decoding of bodies
//! - Outgoing headers, methods and form bodies
//! - Cookie reporting and persistence
//! - Body limits, deadlines and cancellation

use std::time::Duration;

use http_fetch::{
    build_direct, fetch, fetch_with_config, FetchConfig, FetchError, FileType, HttpClient, Method,
    Request, TransportConfig, TransportFailure,
};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn direct_client() -> HttpClient {
    build_direct(&TransportConfig::default()).expect("Failed to build direct client")
}

async fn serve(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_redirect_reports_final_url() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/start",
        ResponseTemplate::new(302).insert_header("Location", format!("{}/final", server.uri())),
    )
    .await;
    serve(
        &server,
        "/final",
        ResponseTemplate::new(200).set_body_string("<html><body>done</body></html>"),
    )
    .await;

    let request = Request::new(format!("{}/start", server.uri()), Method::Get);
    let response = fetch(&request, &direct_client()).await.unwrap();

    assert_eq!(response.url, format!("{}/final", server.uri()));
    assert_eq!(response.code, 200);
    assert_eq!(response.text, "<html><body>done</body></html>");
}

#[tokio::test]
async fn test_utf8_html_text_matches_body() {
    let server = MockServer::start().await;
    let html = "<!DOCTYPE html><html><head><title>héllo wörld</title></head></html>";
    serve(&server, "/", ResponseTemplate::new(200).set_body_string(html)).await;

    let request = Request::new(server.uri(), Method::Get);
    let response = fetch(&request, &direct_client()).await.unwrap();

    assert_eq!(response.mime_type, "text/html; charset=utf-8");
    assert_eq!(response.file_type, Some(FileType::Html));
    assert_eq!(response.file_suffix(), ".html");
    assert_eq!(response.charset, "utf-8");
    assert_eq!(response.text.as_bytes(), &response.body[..]);
}

#[tokio::test]
async fn test_utf8_page_with_stale_meta_label_is_kept_verbatim() {
    let server = MockServer::start().await;
    let html = "<html><head><meta charset=\"iso-8859-1\"></head><body>café</body></html>";
    serve(&server, "/", ResponseTemplate::new(200).set_body_string(html)).await;

    let request = Request::new(server.uri(), Method::Get);
    let response = fetch(&request, &direct_client()).await.unwrap();

    assert_eq!(response.charset, "utf-8");
    assert_eq!(response.text, html);
    assert_eq!(response.text.as_bytes(), &response.body[..]);
}

#[tokio::test]
async fn test_utf8_bom_is_kept_in_text() {
    let server = MockServer::start().await;
    let body = b"\xEF\xBB\xBF<html><body>bom</body></html>".to_vec();
    serve(&server, "/", ResponseTemplate::new(200).set_body_bytes(body.clone())).await;

    let request = Request::new(server.uri(), Method::Get);
    let response = fetch(&request, &direct_client()).await.unwrap();

    assert_eq!(response.charset, "utf-8");
    assert_eq!(response.text.as_bytes(), &body[..]);
}

#[tokio::test]
async fn test_gbk_page_is_transcoded() {
    let server = MockServer::start().await;
    let source = "<html><head><meta charset=\"gbk\"><title>中文页面</title></head></html>";
    let (encoded, _, _) = encoding_rs::GBK.encode(source);
    serve(
        &server,
        "/gbk",
        ResponseTemplate::new(200).set_body_bytes(encoded.into_owned()),
    )
    .await;

    let request = Request::new(format!("{}/gbk", server.uri()), Method::Get);
    let response = fetch(&request, &direct_client()).await.unwrap();

    assert_eq!(response.charset, "gbk");
    assert_eq!(response.text, source);
    assert_ne!(response.text.as_bytes(), &response.body[..]);
}

#[tokio::test]
async fn test_pdf_is_classified_but_not_decoded() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/doc.pdf",
        ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n".to_vec()),
    )
    .await;

    let request = Request::new(format!("{}/doc.pdf", server.uri()), Method::Get);
    let response = fetch(&request, &direct_client()).await.unwrap();

    assert_eq!(response.mime_type, "application/pdf");
    assert_eq!(response.file_type, Some(FileType::Pdf));
    assert!(response.text.is_empty());
    assert!(response.charset.is_empty());
    assert!(!response.body.is_empty());
}

#[tokio::test]
async fn test_unclassified_body_keeps_only_bytes() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/track.mp3",
        ResponseTemplate::new(200).set_body_bytes(b"ID3\x03\x00\x00\x00\x00\x00\x21".to_vec()),
    )
    .await;

    let request = Request::new(format!("{}/track.mp3", server.uri()), Method::Get);
    let response = fetch(&request, &direct_client()).await.unwrap();

    assert_eq!(response.mime_type, "audio/mpeg");
    assert_eq!(response.file_type, None);
    assert_eq!(response.file_suffix(), "");
    assert!(response.text.is_empty());
}

#[tokio::test]
async fn test_declared_content_type_is_not_trusted() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/",
        ResponseTemplate::new(200)
            .set_body_raw("<html><p>page</p></html>", "application/octet-stream"),
    )
    .await;

    let request = Request::new(server.uri(), Method::Get);
    let response = fetch(&request, &direct_client()).await.unwrap();

    assert_eq!(response.mime_type, "text/html; charset=utf-8");
    assert_eq!(
        response.content_type.as_deref(),
        Some("application/octet-stream")
    );
    assert_eq!(response.text, "<html><p>page</p></html>");
}

#[tokio::test]
async fn test_error_status_is_a_response() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/missing",
        ResponseTemplate::new(404).set_body_string("not found"),
    )
    .await;

    let request = Request::new(format!("{}/missing", server.uri()), Method::Get);
    let response = fetch(&request, &direct_client()).await.unwrap();

    assert_eq!(response.code, 404);
    assert_eq!(response.text, "not found");
}

#[tokio::test]
async fn test_post_sends_form_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("a=1&b=2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let request = Request::new(format!("{}/login", server.uri()), Method::Post)
        .form("a", "1")
        .form("b", "2");
    let response = fetch(&request, &direct_client()).await.unwrap();

    assert_eq!(response.text, "ok");
}

#[tokio::test]
async fn test_declared_method_is_sent_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/item"))
        .and(body_string(""))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let request = Request::new(format!("{}/item", server.uri()), Method::Put).form("a", "1");
    let response = fetch(&request, &direct_client()).await.unwrap();

    assert_eq!(response.code, 204);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_headers_accumulate() {
    let server = MockServer::start().await;
    serve(&server, "/", ResponseTemplate::new(200)).await;

    let request = Request::new(server.uri(), Method::Get)
        .user_agent("probe/1.0")
        .header("X-Trace", "a")
        .header("X-Trace", "b");
    fetch(&request, &direct_client()).await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let headers = &received[0].headers;
    let traces: Vec<_> = headers
        .get_all("x-trace")
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(traces, ["a", "b"]);
    assert_eq!(headers.get("user-agent").unwrap(), "probe/1.0");
    assert_eq!(headers.get("accept-language").unwrap(), "zh-CN,zh;q=0.8");
    assert_eq!(
        headers.get("content-type").unwrap(),
        "application/x-www-form-urlencoded"
    );
}

#[tokio::test]
async fn test_cookies_reported_in_server_order() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/",
        ResponseTemplate::new(200)
            .append_header("Set-Cookie", "x=1")
            .append_header("Set-Cookie", "y=2"),
    )
    .await;

    let request = Request::new(server.uri(), Method::Get);
    let response = fetch(&request, &direct_client()).await.unwrap();

    assert_eq!(response.cookies, "x=1;y=2");
}

#[tokio::test]
async fn test_cookie_attributes_are_rendered() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/",
        ResponseTemplate::new(200).insert_header("Set-Cookie", "sid=abc; Path=/; HttpOnly"),
    )
    .await;

    let request = Request::new(server.uri(), Method::Get);
    let response = fetch(&request, &direct_client()).await.unwrap();

    assert_eq!(response.cookies, "sid=abc; Path=/; HttpOnly");
}

#[tokio::test]
async fn test_cookies_persist_across_calls() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/login",
        ResponseTemplate::new(200).insert_header("Set-Cookie", "session=abc; Path=/"),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/account"))
        .and(header("cookie", "session=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("welcome back"))
        .expect(1)
        .mount(&server)
        .await;

    let client = direct_client();
    fetch(&Request::new(format!("{}/login", server.uri()), Method::Get), &client)
        .await
        .unwrap();

    // A clone shares the jar
    let response = fetch(
        &Request::new(format!("{}/account", server.uri()), Method::Get),
        &client.clone(),
    )
    .await
    .unwrap();

    assert_eq!(response.text, "welcome back");
    assert!(response.cookies.is_empty());
}

#[tokio::test]
async fn test_repeated_fetch_is_stable() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/",
        ResponseTemplate::new(200).set_body_string("{\"ok\": true}"),
    )
    .await;

    let client = direct_client();
    let request = Request::new(server.uri(), Method::Get);
    let first = fetch(&request, &client).await.unwrap();
    let second = fetch(&request, &client).await.unwrap();

    assert_eq!(first.code, second.code);
    assert_eq!(first.body, second.body);
    assert_eq!(first.text, second.text);
    assert_eq!(first.mime_type, second.mime_type);
    assert_eq!(first.charset, second.charset);
}

#[tokio::test]
async fn test_invalid_url_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let ftp = server.uri().replacen("http", "ftp", 1);
    let err = fetch(&Request::new(ftp, Method::Get), &direct_client())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::InvalidUrl { .. }));

    let err = fetch(&Request::new("not a url", Method::Get), &direct_client())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_url");
}

#[tokio::test]
async fn test_body_limit() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/big",
        ResponseTemplate::new(200).set_body_string("a".repeat(4096)),
    )
    .await;

    let config = FetchConfig {
        max_body_size: Some(1024),
        ..Default::default()
    };
    let request = Request::new(format!("{}/big", server.uri()), Method::Get);
    let err = fetch_with_config(&request, &direct_client(), &config, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::BodyTooLarge { limit: 1024, .. }));
}

#[tokio::test]
async fn test_body_within_limit() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/",
        ResponseTemplate::new(200).set_body_string("small"),
    )
    .await;

    let config = FetchConfig {
        max_body_size: Some(5),
        ..Default::default()
    };
    let request = Request::new(server.uri(), Method::Get);
    let response =
        fetch_with_config(&request, &direct_client(), &config, &CancellationToken::new())
            .await
            .unwrap();

    assert_eq!(response.text, "small");
}

#[tokio::test]
async fn test_deadline_elapses() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/slow",
        ResponseTemplate::new(200).set_delay(Duration::from_secs(5)),
    )
    .await;

    let request = Request::new(format!("{}/slow", server.uri()), Method::Get)
        .timeout(Duration::from_millis(200));
    let err = fetch(&request, &direct_client()).await.unwrap_err();

    assert!(matches!(err, FetchError::Timeout { deadline, .. } if deadline == Duration::from_millis(200)));
}

#[tokio::test]
async fn test_cancelled_before_start_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let request = Request::new(server.uri(), Method::Get);
    let err = fetch_with_config(&request, &direct_client(), &FetchConfig::default(), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Cancelled { .. }));
}

#[tokio::test]
async fn test_cancelled_in_flight() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/slow",
        ResponseTemplate::new(200).set_delay(Duration::from_secs(5)),
    )
    .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let request = Request::new(format!("{}/slow", server.uri()), Method::Get);
    let err = fetch_with_config(&request, &direct_client(), &FetchConfig::default(), &cancel)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "cancelled");
}

#[tokio::test]
async fn test_malformed_text_returns_lossy_response() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/",
        ResponseTemplate::new(200).set_body_bytes(b"<meta charset=\"shift_jis\"><p>\x82".to_vec()),
    )
    .await;

    let request = Request::new(server.uri(), Method::Get);
    let err = fetch(&request, &direct_client()).await.unwrap_err();

    assert_eq!(err.kind(), "decode");
    let response = err.into_response().unwrap();
    assert_eq!(response.charset, "shift_jis");
    assert!(response.text.ends_with('\u{FFFD}'));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let request = Request::new("http://127.0.0.1:9/", Method::Get);
    let err = fetch(&request, &direct_client()).await.unwrap_err();

    match err {
        FetchError::Transport { kind, .. } => assert_eq!(kind, TransportFailure::Connect),
        other => panic!("expected a transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_redirect_loop_is_transport_error() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/loop",
        ResponseTemplate::new(302).insert_header("Location", format!("{}/loop", server.uri())),
    )
    .await;

    let config = TransportConfig {
        max_redirects: 3,
        ..Default::default()
    };
    let client = build_direct(&config).unwrap();
    let request = Request::new(format!("{}/loop", server.uri()), Method::Get);
    let err = fetch(&request, &client).await.unwrap_err();

    assert!(matches!(
        err,
        FetchError::Transport {
            kind: TransportFailure::Redirect,
            ..
        }
    ));
}

#[tokio::test]
async fn test_timing_is_recorded() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/",
        ResponseTemplate::new(200)
            .set_body_string("timed")
            .set_delay(Duration::from_millis(50)),
    )
    .await;

    let request = Request::new(server.uri(), Method::Get);
    let response = fetch(&request, &direct_client()).await.unwrap();

    assert!(response.timing.response_time >= Duration::from_millis(50));
    assert!(response.timing.total_time >= response.timing.response_time);
    assert!(
        response.timing.total_time
            >= response.timing.response_time + response.timing.download_time
    );
}
