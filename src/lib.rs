//! # respond
//!
//! Low-boilerplate helpers for writing HTTP response bodies: a status code
//! plus a payload (raw bytes, string, JSON, HTML, or a rendered template),
//! written against whatever response object the host framework supplies.
//!
//! ## Quick Start
//!
//! ```rust
//! use respond::ResponseBuffer;
//! use serde_json::json;
//!
//! let mut out = ResponseBuffer::new();
//! respond::json(&mut out, &json!({"status": "ok"}), 200).unwrap();
//!
//! assert_eq!(out.status(), 200);
//! assert_eq!(out.headers().get("content-type"), Some("application/json"));
//! assert_eq!(out.body(), br#"{"status":"ok"}"#);
//! ```
//!
//! Host frameworks plug in by implementing [`ResponseSink`] for their own
//! response type; [`ResponseBuffer`] is provided for hosts that speak raw
//! TCP and for tests. On an error ([`RespondError::Serialize`] or
//! [`RespondError::Template`]) the sink is guaranteed untouched, so the
//! caller can still write a fallback such as `respond::simple(out, 500)`.

pub mod responder;
pub mod sink;
pub mod status;
pub mod template;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use responder::{RespondError, bytes, html, html_template, json, simple, string};
pub use sink::{Headers, ResponseBuffer, ResponseSink};
pub use status::reason_phrase;
pub use template::{TemplateEngine, TemplateError};
