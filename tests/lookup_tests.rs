//! Lookup round-trip tests against a canned-response stub service.

mod common;

use std::time::{Duration, Instant};

use common::StubService;
use geolens::config::Config;
use geolens::highlight::{self, SpanKind};
use geolens::lookup::{LookupClient, LookupPhase, fetch_lookup, lookup_url};
use geolens::lookup_ui::LookupUI;

/// Poll the client until the in-flight lookup settles.
fn wait_for_completion(client: &LookupClient) -> LookupPhase {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let phase = client.phase();
        if !phase.is_loading() {
            return phase;
        }
        assert!(Instant::now() < deadline, "lookup did not settle in time");
        std::thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn test_successful_lookup_decodes_payload() {
    let stub = StubService::json(r#"{"code": "US", "org": "Google"}"#, 1);
    let agent = geolens::http::agent();

    let result = fetch_lookup(&agent, stub.endpoint(), "8.8.8.8").unwrap();
    assert_eq!(result.country_code(), Some("US"));
    assert_eq!(
        result.payload().get("org").and_then(|v| v.as_str()),
        Some("Google")
    );
    stub.join();
}

#[test]
fn test_successful_lookup_highlights_as_key_and_string() {
    let stub = StubService::json(r#"{"code": "US", "org": "Google"}"#, 1);
    let agent = geolens::http::agent();

    let result = fetch_lookup(&agent, stub.endpoint(), "8.8.8.8").unwrap();
    let doc = highlight::highlight_value(result.payload());

    let code_key = doc
        .spans()
        .iter()
        .find(|s| s.text.contains("\"code\""))
        .expect("code key span");
    assert_eq!(code_key.kind, SpanKind::Key);

    let us_value = doc
        .spans()
        .iter()
        .find(|s| s.text == "\"US\"")
        .expect("US value span");
    assert_eq!(us_value.kind, SpanKind::Str);
    stub.join();
}

#[test]
fn test_client_publishes_success_phase() {
    let stub = StubService::json(r#"{"ip": "8.8.8.8", "code": "US"}"#, 1);
    let client = LookupClient::new(geolens::http::agent(), stub.endpoint().to_string());

    client.perform_lookup("8.8.8.8");
    assert!(client.phase().is_loading());

    match wait_for_completion(&client) {
        LookupPhase::Success(result) => assert_eq!(result.country_code(), Some("US")),
        other => panic!("expected success, got {other:?}"),
    }
    stub.join();
}

#[test]
fn test_http_failure_publishes_error_description() {
    let stub = StubService::failure(400, 1);
    let client = LookupClient::new(geolens::http::agent(), stub.endpoint().to_string());

    client.perform_lookup("not-an-ip");
    match wait_for_completion(&client) {
        LookupPhase::Failed(description) => {
            assert!(!description.is_empty());
        }
        other => panic!("expected failure, got {other:?}"),
    }
    stub.join();
}

#[test]
fn test_undecodable_body_is_a_failure() {
    let stub = StubService::json("this is not json", 1);
    let agent = geolens::http::agent();

    let err = fetch_lookup(&agent, stub.endpoint(), "8.8.8.8").unwrap_err();
    assert!(err.to_string().contains("decode"));
    stub.join();
}

#[test]
fn test_connection_refused_is_a_failure() {
    // Port 1 on loopback is never listening.
    let agent = geolens::http::agent();
    assert!(fetch_lookup(&agent, "http://127.0.0.1:1", "8.8.8.8").is_err());
}

#[test]
fn test_request_path_embeds_input_literally() {
    assert_eq!(
        lookup_url("http://127.0.0.1:8000", "not-an-ip"),
        "http://127.0.0.1:8000/api/v1/geoip/lookup/not-an-ip"
    );
}

#[test]
fn test_empty_submit_opens_notice_without_dispatch() {
    let mut ui = LookupUI::new(&Config::default());

    ui.prefill_and_submit("");
    assert!(ui.is_notice_open());
    assert!(matches!(ui.phase(), LookupPhase::Idle));

    // Whitespace-only input trims to empty and is rejected the same way.
    ui.prefill_and_submit("   \t ");
    assert!(ui.is_notice_open());
    assert!(matches!(ui.phase(), LookupPhase::Idle));
}

#[test]
fn test_input_is_trimmed_before_dispatch() {
    let stub = StubService::json(r#"{"ip": "1.1.1.1"}"#, 1);
    let mut config = Config::default();
    config.endpoint = stub.endpoint().to_string();

    let mut ui = LookupUI::new(&config);
    ui.prefill_and_submit("  1.1.1.1  ");
    assert!(!ui.is_notice_open());
    assert!(ui.is_loading() || !matches!(ui.phase(), LookupPhase::Idle));

    let deadline = Instant::now() + Duration::from_secs(5);
    while ui.is_loading() {
        assert!(Instant::now() < deadline, "lookup did not settle in time");
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(matches!(ui.phase(), LookupPhase::Success(_)));
    stub.join();
}

#[test]
fn test_overlapping_lookups_both_complete() {
    // No de-duplication and no cancellation: two overlapping lookups both
    // run to completion and each publishes into the shared slot, so the
    // revision advances once per dispatch and once per response.
    let stub = StubService::json(r#"{"code": "US"}"#, 2);
    let client = LookupClient::new(geolens::http::agent(), stub.endpoint().to_string());

    client.perform_lookup("8.8.8.8");
    client.perform_lookup("1.1.1.1");

    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let (revision, phase) = client.snapshot();
        if revision >= 4 {
            assert!(matches!(phase, LookupPhase::Success(_)));
            break;
        }
        assert!(Instant::now() < deadline, "lookups did not settle in time");
        std::thread::sleep(Duration::from_millis(10));
    }
    stub.join();
}
