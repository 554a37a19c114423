//! Response-writing helpers.
//!
//! Every function here is a single synchronous transformation of
//! `(status code, payload)` into writes against a [`ResponseSink`], in wire
//! order: headers (if any) before the status code, status code before the
//! body. Fallible preparation — JSON serialization, template rendering —
//! completes before the sink is touched, so an error never leaves a
//! half-written response behind.
//!
//! On error the caller is expected to write its own fallback, typically
//! `simple(sink, 500)`; nothing here retries.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::sink::ResponseSink;
use crate::status::reason_phrase;
use crate::template::{TemplateEngine, TemplateError};

/// Errors produced by the response helpers.
#[derive(Debug, Error)]
pub enum RespondError {
    /// The value could not be serialized to JSON. The sink was not touched.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The template could not be resolved or rendered. The sink was not touched.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The sink's own write failed (e.g. a broken connection), after the
    /// status code was already set. Passed through unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sets the status code on the sink, then writes `payload` verbatim as the
/// response body.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Only the sink's own write can fail; the failure is passed through as
/// [`RespondError::Io`].
pub fn bytes<S>(sink: &mut S, payload: &[u8], status: u16) -> Result<usize, RespondError>
where
    S: ResponseSink + ?Sized,
{
    sink.set_status(status);
    let written = sink.write_body(payload)?;
    debug!(status, bytes = written, "response body written");
    Ok(written)
}

/// Writes `payload` as the response body, encoded as UTF-8.
///
/// Equivalent to [`bytes`] with the string's byte representation.
pub fn string<S>(sink: &mut S, payload: &str, status: u16) -> Result<usize, RespondError>
where
    S: ResponseSink + ?Sized,
{
    bytes(sink, payload.as_bytes(), status)
}

/// Writes the canonical reason phrase for `status` as the body.
///
/// `simple(sink, 400)` is the equivalent of
/// `string(sink, "Bad Request", 400)`. Codes without a standard phrase
/// produce an empty body.
pub fn simple<S>(sink: &mut S, status: u16) -> Result<usize, RespondError>
where
    S: ResponseSink + ?Sized,
{
    string(sink, reason_phrase(status), status)
}

/// Serializes `value` to JSON and writes it as the body, with
/// `Content-Type: application/json`.
///
/// # Errors
///
/// [`RespondError::Serialize`] if `value` cannot be serialized; in that case
/// the sink is left completely untouched — no header, no status, no body.
pub fn json<S, T>(sink: &mut S, value: &T, status: u16) -> Result<usize, RespondError>
where
    S: ResponseSink + ?Sized,
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_vec(value)?;
    sink.set_header("Content-Type", "application/json");
    bytes(sink, &payload, status)
}

/// Writes an HTML string as the body, with `Content-Type: text/html`.
pub fn html<S>(sink: &mut S, markup: &str, status: u16) -> Result<usize, RespondError>
where
    S: ResponseSink + ?Sized,
{
    sink.set_header("Content-Type", "text/html");
    string(sink, markup, status)
}

/// Renders the named template against `data` and writes the result via
/// [`html`].
///
/// # Errors
///
/// [`RespondError::Serialize`] if `data` cannot be converted to a JSON value,
/// [`RespondError::Template`] if the template is missing or fails to render.
/// Either way the sink is left completely untouched; the caller should write
/// its own fallback, such as `simple(sink, 500)`.
pub fn html_template<S, E, T>(
    sink: &mut S,
    engine: &E,
    name: &str,
    data: &T,
    status: u16,
) -> Result<usize, RespondError>
where
    S: ResponseSink + ?Sized,
    E: TemplateEngine + ?Sized,
    T: Serialize + ?Sized,
{
    let data = serde_json::to_value(data)?;
    let rendered = engine.render(name, &data)?;
    debug!(template = name, bytes = rendered.len(), "template rendered");
    html(sink, &rendered, status)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io;

    use serde::ser::Error as _;
    use serde_json::{Value, json};

    use super::*;

    /// A sink that records every call in order, for asserting wire ordering.
    #[derive(Debug, Default)]
    struct RecordingSink {
        events: Vec<Event>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Status(u16),
        Header(String, String),
        Write(Vec<u8>),
    }

    impl ResponseSink for RecordingSink {
        fn set_status(&mut self, code: u16) {
            self.events.push(Event::Status(code));
        }

        fn set_header(&mut self, name: &str, value: &str) {
            self.events
                .push(Event::Header(name.to_owned(), value.to_owned()));
        }

        fn write_body(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.events.push(Event::Write(buf.to_vec()));
            Ok(buf.len())
        }
    }

    /// A sink whose transport is already gone.
    struct BrokenSink {
        status_sets: usize,
    }

    impl ResponseSink for BrokenSink {
        fn set_status(&mut self, _code: u16) {
            self.status_sets += 1;
        }

        fn set_header(&mut self, _name: &str, _value: &str) {}

        fn write_body(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer went away"))
        }
    }

    /// A value whose `Serialize` impl always fails.
    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("deliberately unserializable"))
        }
    }

    /// Map-backed template engine: values are the pre-rendered output.
    struct FixedTemplates(HashMap<&'static str, &'static str>);

    impl TemplateEngine for FixedTemplates {
        fn render(&self, name: &str, data: &Value) -> Result<String, TemplateError> {
            let body = self.0.get(name).ok_or_else(|| TemplateError::NotFound {
                name: name.to_owned(),
            })?;
            if data.get("poison").is_some() {
                return Err(TemplateError::Render {
                    name: name.to_owned(),
                    message: "poisoned data".to_owned(),
                });
            }
            Ok((*body).to_owned())
        }
    }

    fn greeting_engine() -> FixedTemplates {
        FixedTemplates(HashMap::from([("greeting.html", "<h1>hi</h1>")]))
    }

    #[test]
    fn bytes_sets_status_before_body() {
        let mut sink = RecordingSink::default();
        let n = bytes(&mut sink, b"payload", 200).unwrap();
        assert_eq!(n, 7);
        assert_eq!(
            sink.events,
            vec![Event::Status(200), Event::Write(b"payload".to_vec())]
        );
    }

    #[test]
    fn bytes_forwards_any_status_verbatim() {
        let mut sink = RecordingSink::default();
        bytes(&mut sink, b"", 999).unwrap();
        assert_eq!(sink.events[0], Event::Status(999));
    }

    #[test]
    fn string_writes_utf8_bytes() {
        let mut sink = RecordingSink::default();
        let n = string(&mut sink, "héllo", 200).unwrap();
        assert_eq!(n, "héllo".len());
        assert_eq!(sink.events[1], Event::Write("héllo".as_bytes().to_vec()));
    }

    #[test]
    fn simple_writes_reason_phrase() {
        let mut sink = RecordingSink::default();
        simple(&mut sink, 404).unwrap();
        assert_eq!(
            sink.events,
            vec![Event::Status(404), Event::Write(b"Not Found".to_vec())]
        );
    }

    #[test]
    fn simple_with_unmapped_code_writes_empty_body() {
        let mut sink = RecordingSink::default();
        let n = simple(&mut sink, 599).unwrap();
        assert_eq!(n, 0);
        assert_eq!(sink.events, vec![Event::Status(599), Event::Write(vec![])]);
    }

    #[test]
    fn json_sets_header_then_status_then_body() {
        let mut sink = RecordingSink::default();
        json(&mut sink, &json!({"a": 1}), 200).unwrap();
        assert_eq!(
            sink.events,
            vec![
                Event::Header("Content-Type".into(), "application/json".into()),
                Event::Status(200),
                Event::Write(br#"{"a":1}"#.to_vec()),
            ]
        );
    }

    #[test]
    fn json_serialization_failure_leaves_sink_untouched() {
        let mut sink = RecordingSink::default();
        let err = json(&mut sink, &Unserializable, 200).unwrap_err();
        assert!(matches!(err, RespondError::Serialize(_)));
        assert!(sink.events.is_empty());
    }

    #[test]
    fn html_sets_content_type() {
        let mut sink = RecordingSink::default();
        html(&mut sink, "<p>hi</p>", 201).unwrap();
        assert_eq!(
            sink.events,
            vec![
                Event::Header("Content-Type".into(), "text/html".into()),
                Event::Status(201),
                Event::Write(b"<p>hi</p>".to_vec()),
            ]
        );
    }

    #[test]
    fn html_template_renders_and_delegates() {
        let mut sink = RecordingSink::default();
        html_template(&mut sink, &greeting_engine(), "greeting.html", &json!({}), 200).unwrap();
        assert_eq!(
            sink.events,
            vec![
                Event::Header("Content-Type".into(), "text/html".into()),
                Event::Status(200),
                Event::Write(b"<h1>hi</h1>".to_vec()),
            ]
        );
    }

    #[test]
    fn html_template_missing_template_leaves_sink_untouched() {
        let mut sink = RecordingSink::default();
        let err =
            html_template(&mut sink, &greeting_engine(), "nope.html", &json!({}), 200).unwrap_err();
        assert!(matches!(
            err,
            RespondError::Template(TemplateError::NotFound { .. })
        ));
        assert!(sink.events.is_empty());
    }

    #[test]
    fn html_template_render_failure_leaves_sink_untouched() {
        let mut sink = RecordingSink::default();
        let err = html_template(
            &mut sink,
            &greeting_engine(),
            "greeting.html",
            &json!({"poison": true}),
            200,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RespondError::Template(TemplateError::Render { .. })
        ));
        assert!(sink.events.is_empty());
    }

    #[test]
    fn html_template_unserializable_data_leaves_sink_untouched() {
        let mut sink = RecordingSink::default();
        let err = html_template(
            &mut sink,
            &greeting_engine(),
            "greeting.html",
            &Unserializable,
            200,
        )
        .unwrap_err();
        assert!(matches!(err, RespondError::Serialize(_)));
        assert!(sink.events.is_empty());
    }

    #[test]
    fn sink_write_failure_passes_through() {
        let mut sink = BrokenSink { status_sets: 0 };
        let err = string(&mut sink, "doomed", 200).unwrap_err();
        assert!(matches!(err, RespondError::Io(_)));
        // The status was already forwarded when the write failed.
        assert_eq!(sink.status_sets, 1);
    }

    #[test]
    fn double_write_is_not_deduplicated() {
        let mut sink = RecordingSink::default();
        string(&mut sink, "one", 200).unwrap();
        string(&mut sink, "two", 500).unwrap();
        assert_eq!(
            sink.events,
            vec![
                Event::Status(200),
                Event::Write(b"one".to_vec()),
                Event::Status(500),
                Event::Write(b"two".to_vec()),
            ]
        );
    }

    #[test]
    fn json_works_against_response_buffer() {
        use crate::sink::ResponseBuffer;

        let mut out = ResponseBuffer::new();
        json(&mut out, &json!({"a": 1}), 200).unwrap();
        assert_eq!(out.status(), 200);
        assert_eq!(out.headers().get("content-type"), Some("application/json"));
        assert_eq!(out.body(), br#"{"a":1}"#);
    }
}
