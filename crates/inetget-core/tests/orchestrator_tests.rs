//! End-to-end tests for `run_transfer` against a mock HTTP server.
//!
//! These drive the full orchestrator — client, streaming loop, sink — the
//! way `inetget-cli`'s `main` does, without going through argument parsing.

use std::sync::Arc;

use inetget_core::listener::NullListener;
use inetget_core::orchestrator::run_transfer;
use inetget_core::progress::NullConsoleTitle;
use inetget_core::sink::{FileSink, NullSink, Sink, StdOutSink};
use inetget_core::sync::AbortSignal;
use inetget_core::types::{Params, PostData, Scheme, Url, Verb};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn url_for(server: &MockServer, path: &str) -> Url {
    let uri = server.uri();
    let rest = uri.strip_prefix("http://").expect("wiremock always serves http");
    let (host, port) = rest.split_once(':').expect("wiremock URI always has a port");
    Url {
        scheme: Scheme::Http,
        host: host.to_string(),
        port: port.parse().unwrap(),
        user: None,
        password: None,
        path: path.to_string(),
        query: None,
    }
}

#[tokio::test]
async fn delivers_declared_content_length_byte_exact() {
    let server = MockServer::start().await;
    let body = b"the quick brown fox jumps over the lazy dog".to_vec();
    Mock::given(method("GET"))
        .and(path("/f.bin"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body.clone())
                .insert_header("last-modified", "Wed, 01 Jan 2020 00:00:00 GMT"),
        )
        .mount(&server)
        .await;

    let url = url_for(&server, "/f.bin");
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.bin");
    let sink: Box<dyn Sink> = Box::new(FileSink::open(&target).unwrap());

    let params = Params {
        set_file_time: true,
        ..Params::default()
    };
    let outcome = run_transfer(
        &url,
        &params,
        None,
        sink,
        Arc::new(NullListener),
        &NullConsoleTitle,
        &AbortSignal::new(),
    )
    .await
    .unwrap();

    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(std::fs::read(&target).unwrap(), body);
}

#[tokio::test]
async fn conditional_request_skips_on_not_modified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/f.bin"))
        .and(header("if-modified-since", "Thu, 01 Jan 1970 00:00:10 GMT"))
        .respond_with(ResponseTemplate::new(304))
        .mount(&server)
        .await;

    let url = url_for(&server, "/f.bin");
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.bin");
    std::fs::write(&target, b"stale local copy").unwrap();
    let sink: Box<dyn Sink> = Box::new(FileSink::open(&target).unwrap());

    let params = Params {
        update_mode: true,
        ..Params::default()
    };
    let outcome = run_transfer(
        &url,
        &params,
        Some(10),
        sink,
        Arc::new(NullListener),
        &NullConsoleTitle,
        &AbortSignal::new(),
    )
    .await
    .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.message, "skipped (not modified)");
    assert_eq!(std::fs::read(&target).unwrap(), b"stale local copy");
}

#[tokio::test]
async fn post_body_is_form_encoded_on_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit"))
        .and(body_string("foo%3Dbar+baz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .mount(&server)
        .await;

    let url = url_for(&server, "/submit");
    let params = Params {
        verb: Verb::Post,
        post_data: PostData::Literal(b"foo=bar baz".to_vec()),
        ..Params::default()
    };
    let outcome = run_transfer(
        &url,
        &params,
        None,
        Box::new(NullSink::new()),
        Arc::new(NullListener),
        &NullConsoleTitle,
        &AbortSignal::new(),
    )
    .await
    .unwrap();

    assert!(outcome.success, "{}", outcome.message);
}

#[tokio::test]
async fn stdout_sink_receives_the_full_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tiny"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"abc".to_vec()))
        .mount(&server)
        .await;

    let url = url_for(&server, "/tiny");
    let sink: Box<dyn Sink> = Box::new(StdOutSink::open().unwrap());
    let outcome = run_transfer(
        &url,
        &Params::default(),
        None,
        sink,
        Arc::new(NullListener),
        &NullConsoleTitle,
        &AbortSignal::new(),
    )
    .await
    .unwrap();

    assert!(outcome.success, "{}", outcome.message);
}

#[tokio::test]
async fn server_error_status_fails_and_discards_output_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = url_for(&server, "/missing");
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.bin");
    let sink: Box<dyn Sink> = Box::new(FileSink::open(&target).unwrap());

    let outcome = run_transfer(
        &url,
        &Params::default(),
        None,
        sink,
        Arc::new(NullListener),
        &NullConsoleTitle,
        &AbortSignal::new(),
    )
    .await
    .unwrap();

    assert!(!outcome.success);
    assert!(!target.exists());
}

#[tokio::test]
async fn keep_failed_preserves_partial_output_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let url = url_for(&server, "/missing");
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.bin");
    let sink: Box<dyn Sink> = Box::new(FileSink::open(&target).unwrap());

    let params = Params {
        keep_failed: true,
        ..Params::default()
    };
    let outcome = run_transfer(
        &url,
        &params,
        None,
        sink,
        Arc::new(NullListener),
        &NullConsoleTitle,
        &AbortSignal::new(),
    )
    .await
    .unwrap();

    assert!(!outcome.success);
    let mut partial = target.clone().into_os_string();
    partial.push(".partial");
    assert!(std::path::PathBuf::from(partial).exists());
}
