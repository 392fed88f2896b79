//! Response-writer handle.
//!
//! Server-side transport adapters implement [`ResponseWriter`] over their
//! native response type and install the handle on the call's context via
//! [`setters::with_response_writer`](crate::setters::with_response_writer).
//! The contract assumes one logical writer per call, touched only by that
//! call's own execution path — middleware layers run in sequence, never
//! concurrently within a call.

use std::sync::Mutex;

use http::{HeaderMap, HeaderName, HeaderValue};

/// Sink for response headers set by handlers and middleware.
///
/// Object-safe so the context can carry it as an opaque handle; the context
/// itself never inspects what is behind it.
pub trait ResponseWriter: Send + Sync {
    /// Sets `name` to `value`, replacing any existing values.
    fn set_header(&self, name: HeaderName, value: HeaderValue);

    /// Appends `value` to any existing values for `name`.
    fn append_header(&self, name: HeaderName, value: HeaderValue);
}

/// A mutex-backed header buffer implementing [`ResponseWriter`].
///
/// For transports that assemble the HTTP response only after the handler
/// returns: install one of these on the context, run the call, then [`take`]
/// the collected headers and merge them into the outgoing response. Also the
/// natural test double.
///
/// [`take`]: ResponseHeaders::take
#[derive(Default)]
pub struct ResponseHeaders {
    headers: Mutex<HeaderMap>,
}

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything collected so far.
    pub fn take(&self) -> HeaderMap {
        std::mem::take(&mut self.headers.lock().expect("header buffer poisoned"))
    }
}

impl ResponseWriter for ResponseHeaders {
    fn set_header(&self, name: HeaderName, value: HeaderValue) {
        self.headers.lock().expect("header buffer poisoned").insert(name, value);
    }

    fn append_header(&self, name: HeaderName, value: HeaderValue) {
        self.headers.lock().expect("header buffer poisoned").append(name, value);
    }
}
