//! Highlighter contract tests: classification and lossless wrapping.

use geolens::highlight::{HighlightedDocument, SpanKind, highlight_text, highlight_value, serialize};
use serde_json::json;

fn span_kinds(doc: &HighlightedDocument, needle: &str) -> Vec<SpanKind> {
    doc.spans()
        .iter()
        .filter(|s| s.text.contains(needle))
        .map(|s| s.kind)
        .collect()
}

#[test]
fn test_stripping_wrappers_reproduces_serialization() {
    let payloads = [
        json!({}),
        json!({"ip": "8.8.8.8"}),
        json!({"code": "US", "country": "United States", "lat": 37.386, "lon": -122.0838}),
        json!({"nested": {"list": [1, 2, 3], "flag": true, "nothing": null}}),
        json!([{"a": 1}, {"b": -2.5}, "plain", false, null]),
    ];
    for payload in payloads {
        let doc = highlight_value(&payload);
        assert_eq!(doc.plain_text(), serialize(&payload));
    }
}

#[test]
fn test_service_response_model_classification() {
    // The full shape the lookup service returns.
    let payload = json!({
        "ip": "8.8.8.8",
        "code": "US",
        "country": "United States",
        "continent": "North America",
        "continent_code": "NA",
        "city": "Mountain View",
        "lat": 37.386,
        "lon": -122.0838,
        "tz": "America/Los_Angeles",
        "currency": "USD",
        "isp": "Google LLC",
        "asn": 15169
    });
    let doc = highlight_value(&payload);

    for key in ["\"ip\"", "\"code\"", "\"lat\"", "\"asn\""] {
        assert_eq!(span_kinds(&doc, key), vec![SpanKind::Key], "{key}");
    }
    assert_eq!(span_kinds(&doc, "\"US\""), vec![SpanKind::Str]);
    assert_eq!(span_kinds(&doc, "15169"), vec![SpanKind::Num]);
    assert_eq!(span_kinds(&doc, "-122.0838"), vec![SpanKind::Num]);
}

#[test]
fn test_quoted_before_colon_is_key_elsewhere_string() {
    let doc = highlight_text(r#"{"name": "name"}"#);
    let kinds: Vec<_> = doc
        .spans()
        .iter()
        .filter(|s| s.text.contains("\"name\""))
        .map(|s| s.kind)
        .collect();
    assert_eq!(kinds, vec![SpanKind::Key, SpanKind::Str]);
}

#[test]
fn test_boolean_and_null_classified_at_any_depth() {
    let payload = json!({
        "top": true,
        "wrap": {"mid": false, "deeper": {"gone": null, "list": [true, null, false]}}
    });
    let doc = highlight_value(&payload);

    let bools = doc
        .spans()
        .iter()
        .filter(|s| s.kind == SpanKind::Bool)
        .count();
    let nulls = doc
        .spans()
        .iter()
        .filter(|s| s.kind == SpanKind::Null)
        .count();
    assert_eq!(bools, 4);
    assert_eq!(nulls, 2);
}

#[test]
fn test_number_forms_classified() {
    let doc = highlight_text(r#"[0, -7, 3.25, -0.125, 2e10, 6.02e23, 1.5e-3, 9E+4]"#);
    let numbers: Vec<_> = doc
        .spans()
        .iter()
        .filter(|s| s.kind == SpanKind::Num)
        .map(|s| s.text.as_str())
        .collect();
    assert_eq!(
        numbers,
        vec!["0", "-7", "3.25", "-0.125", "2e10", "6.02e23", "1.5e-3", "9E+4"]
    );
}

#[test]
fn test_unwrap_then_rehighlight_is_stable() {
    let payload = json!({"code": "NO", "lat": 59.91, "ok": true, "gone": null});
    let first = highlight_value(&payload);
    let second = highlight_text(&first.plain_text());
    assert_eq!(first.plain_text(), second.plain_text());
    assert_eq!(first.spans().len(), second.spans().len());
}

#[test]
fn test_wrapping_never_alters_content() {
    let raw = "{\n  \"tricky\": \"colon: inside\",\n  \"esc\": \"a\\\"b\"\n}";
    let doc = highlight_text(raw);
    assert_eq!(doc.plain_text(), raw);
}
