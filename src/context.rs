//! Per-call execution context and the metadata it carries.
//!
//! A [`Context`] travels with every RPC from the moment the transport accepts
//! it until the response is written. It is **immutable**: every writer returns
//! a new `Context` layered over the old one, so a handle you already hold can
//! never change underneath you. That single property is what lets contexts be
//! shared freely across concurrent calls with no locking — there is nothing
//! to race on.
//!
//! # Who writes what
//!
//! The metadata slots are a fixed, reserved set — not a general-purpose map.
//! Call identity (service, method, protobuf package) and the response-writer
//! handle are stamped by transport adapters via [`setters`](crate::setters);
//! application code only reads them. Outbound request headers are the one
//! slot callers install themselves, through
//! [`Context::with_http_request_headers`].
//!
//! ```rust
//! use tether::{Context, setters};
//!
//! let ctx = setters::with_service_name(&Context::new(), "Haberdasher");
//! let ctx = setters::with_method_name(&ctx, "MakeHat");
//!
//! assert_eq!(ctx.service_name(), Some("Haberdasher"));
//! assert_eq!(ctx.method_name(), Some("MakeHat"));
//! ```
//!
//! # HTTP headers are a framework detail
//!
//! Headers never appear in request or response messages — they are visible
//! only through this narrow API, readable by middleware and the transport,
//! invisible to generated service implementations. That asymmetry is
//! deliberate: it keeps transport concerns out of handler logic.

use std::sync::Arc;

use http::{HeaderMap, HeaderName, HeaderValue, header};

use crate::error::ReservedHeaderError;
use crate::writer::ResponseWriter;

// ── Reserved header table ─────────────────────────────────────────────────────

/// The framework version header stamped on every outbound request.
pub const VERSION_HEADER: HeaderName = HeaderName::from_static("tether-version");

/// Header names the transport layer owns on outbound requests. Installing any
/// of these via [`Context::with_http_request_headers`] is rejected — the
/// protocol stops working if middleware overrides them.
pub const RESERVED_REQUEST_HEADERS: [HeaderName; 3] =
    [header::ACCEPT, header::CONTENT_TYPE, VERSION_HEADER];

/// Header names the transport layer owns on responses. Checked by
/// [`Context::set_http_response_header`] and
/// [`Context::add_http_response_header`].
///
/// Extending either reserved set is a one-line edit here; every writer
/// consults these tables and nothing else.
pub const RESERVED_RESPONSE_HEADERS: [HeaderName; 1] = [header::CONTENT_TYPE];

// ── Context ───────────────────────────────────────────────────────────────────

/// The immutable, per-call carrier of RPC metadata.
///
/// Cloning is one atomic increment. Writers copy the (small, fixed) slot
/// struct into a fresh `Arc`, so a `Context` obtained earlier never observes
/// a later write.
#[derive(Clone, Default)]
pub struct Context {
    inner: Arc<Slots>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("method_name", &self.inner.method_name)
            .field("service_name", &self.inner.service_name)
            .field("package_name", &self.inner.package_name)
            .field("status_code", &self.inner.status_code)
            .field("request_headers", &self.inner.request_headers)
            .field("response_writer", &self.inner.response_writer.as_ref().map(|_| ".."))
            .finish()
    }
}

/// One optional slot per reserved metadata key.
#[derive(Clone, Default)]
struct Slots {
    method_name: Option<String>,
    service_name: Option<String>,
    package_name: Option<String>,
    status_code: Option<String>,
    request_headers: Option<HeaderMap>,
    response_writer: Option<Arc<dyn ResponseWriter>>,
}

impl Context {
    /// An empty root context. Transport adapters create one per inbound call;
    /// tests create them freely.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy-on-write: every writer funnels through here.
    fn update(&self, f: impl FnOnce(&mut Slots)) -> Self {
        let mut slots = (*self.inner).clone();
        f(&mut slots);
        Self { inner: Arc::new(slots) }
    }

    // ── Readers ──────────────────────────────────────────────────────────────

    /// The name of the RPC method being handled, e.g. `"MakeHat"`.
    /// `None` if not known.
    pub fn method_name(&self) -> Option<&str> {
        self.inner.method_name.as_deref()
    }

    /// The name of the service handling the call, e.g. `"Haberdasher"`.
    /// `None` if not known.
    pub fn service_name(&self) -> Option<&str> {
        self.inner.service_name.as_deref()
    }

    /// The fully-qualified protobuf package name of the service.
    ///
    /// `None` if not known. `Some("")` if the service comes from a proto file
    /// that declares no package — that is a real answer, not an absence, and
    /// callers must treat the two differently.
    ///
    /// Note the protobuf package name has no relation to any Rust module or
    /// crate name.
    pub fn package_name(&self) -> Option<&str> {
        self.inner.package_name.as_deref()
    }

    /// The status code of the response, as a decimal string like `"200"`.
    /// `None` if not yet known.
    pub fn status_code(&self) -> Option<&str> {
        self.inner.status_code.as_deref()
    }

    /// Headers previously installed via [`with_http_request_headers`].
    /// Read by the outbound transport when it assembles the HTTP request.
    ///
    /// [`with_http_request_headers`]: Context::with_http_request_headers
    pub fn http_request_headers(&self) -> Option<&HeaderMap> {
        self.inner.request_headers.as_ref()
    }

    // ── Header bridging ──────────────────────────────────────────────────────

    /// Installs headers to be merged into the outbound HTTP request.
    ///
    /// When using a tether-generated client, pass the returned context into
    /// any request method and the stored headers ride along — useful for
    /// authorization tokens, client IDs, and the like. The headers are a
    /// tether implementation detail: visible to middleware and the transport,
    /// never to the server's service implementation.
    ///
    /// The map is deep-copied on success, so mutating `headers` afterwards
    /// does not affect the returned context.
    ///
    /// # Errors
    ///
    /// [`ReservedHeaderError`] if `headers` contains any name in
    /// [`RESERVED_REQUEST_HEADERS`] — those belong to the transport.
    pub fn with_http_request_headers(
        &self,
        headers: &HeaderMap,
    ) -> Result<Self, ReservedHeaderError> {
        for name in &RESERVED_REQUEST_HEADERS {
            if headers.contains_key(name) {
                return Err(ReservedHeaderError::new(name.clone()));
            }
        }

        let copied = headers.clone();
        Ok(self.update(|s| s.request_headers = Some(copied)))
    }

    /// Sets (replacing) a header on the HTTP response for this call.
    ///
    /// Works on a context provided by a tether-generated server, or any child
    /// of one — useful for responding with headers like `cache-control`. On a
    /// context with no response-writer handle (a fresh [`Context::new`] in a
    /// unit test, say) this is a silent no-op, not an error; test doubles stay
    /// trivial that way.
    ///
    /// # Errors
    ///
    /// [`ReservedHeaderError`] if `name` is in [`RESERVED_RESPONSE_HEADERS`],
    /// writer handle or not.
    pub fn set_http_response_header(
        &self,
        name: HeaderName,
        value: HeaderValue,
    ) -> Result<(), ReservedHeaderError> {
        check_response_header(&name)?;
        if let Some(writer) = &self.inner.response_writer {
            writer.set_header(name, value);
        }
        Ok(())
    }

    /// Like [`set_http_response_header`], but appends to any existing values
    /// for `name` instead of replacing them.
    ///
    /// [`set_http_response_header`]: Context::set_http_response_header
    pub fn add_http_response_header(
        &self,
        name: HeaderName,
        value: HeaderValue,
    ) -> Result<(), ReservedHeaderError> {
        check_response_header(&name)?;
        if let Some(writer) = &self.inner.response_writer {
            writer.append_header(name, value);
        }
        Ok(())
    }

    // ── Crate-internal writers (public surface lives in `setters`) ───────────

    pub(crate) fn with_method_name(&self, name: String) -> Self {
        self.update(|s| s.method_name = Some(name))
    }

    pub(crate) fn with_service_name(&self, name: String) -> Self {
        self.update(|s| s.service_name = Some(name))
    }

    pub(crate) fn with_package_name(&self, name: String) -> Self {
        self.update(|s| s.package_name = Some(name))
    }

    pub(crate) fn with_status_code(&self, code: u16) -> Self {
        self.update(|s| s.status_code = Some(code.to_string()))
    }

    pub(crate) fn with_response_writer(&self, writer: Arc<dyn ResponseWriter>) -> Self {
        self.update(|s| s.response_writer = Some(writer))
    }
}

fn check_response_header(name: &HeaderName) -> Result<(), ReservedHeaderError> {
    if RESERVED_RESPONSE_HEADERS.contains(name) {
        return Err(ReservedHeaderError::new(name.clone()));
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use http::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};

    use super::*;
    use crate::setters;
    use crate::writer::ResponseHeaders;

    fn value(s: &'static str) -> HeaderValue {
        HeaderValue::from_static(s)
    }

    #[test]
    fn identity_keys_round_trip() {
        let ctx = Context::new();
        assert_eq!(ctx.method_name(), None);
        assert_eq!(ctx.service_name(), None);

        let ctx = setters::with_service_name(&ctx, "Haberdasher");
        let ctx = setters::with_method_name(&ctx, "MakeHat");
        assert_eq!(ctx.service_name(), Some("Haberdasher"));
        assert_eq!(ctx.method_name(), Some("MakeHat"));
    }

    #[test]
    fn empty_package_name_is_present_not_absent() {
        let ctx = Context::new();
        assert_eq!(ctx.package_name(), None);

        let ctx = setters::with_package_name(&ctx, "");
        assert_eq!(ctx.package_name(), Some(""));
    }

    #[test]
    fn status_code_stored_as_decimal_string() {
        let ctx = setters::with_status_code(&Context::new(), 200);
        assert_eq!(ctx.status_code(), Some("200"));
    }

    #[test]
    fn writers_never_mutate_their_input() {
        let parent = setters::with_method_name(&Context::new(), "First");
        let child = setters::with_method_name(&parent, "Second");

        assert_eq!(parent.method_name(), Some("First"));
        assert_eq!(child.method_name(), Some("Second"));
    }

    #[test]
    fn request_headers_round_trip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-client-id", value("abc"));
        headers.append("x-tag", value("one"));
        headers.append("x-tag", value("two"));

        let ctx = Context::new().with_http_request_headers(&headers).unwrap();
        let stored = ctx.http_request_headers().unwrap();

        assert_eq!(stored.get("x-client-id"), Some(&value("abc")));
        let tags: Vec<_> = stored.get_all("x-tag").iter().collect();
        assert_eq!(tags, [&value("one"), &value("two")]);
    }

    #[test]
    fn reserved_request_headers_rejected() {
        for name in [ACCEPT, CONTENT_TYPE, VERSION_HEADER] {
            let mut headers = HeaderMap::new();
            headers.insert(name.clone(), value("x"));

            let err = Context::new().with_http_request_headers(&headers).unwrap_err();
            assert_eq!(err.name(), &name);
        }
    }

    #[test]
    fn stored_request_headers_are_isolated_from_the_source_map() {
        let mut headers = HeaderMap::new();
        headers.insert("x-client-id", value("before"));

        let ctx = Context::new().with_http_request_headers(&headers).unwrap();
        headers.insert("x-client-id", value("after"));
        headers.insert("x-extra", value("sneaky"));

        let stored = ctx.http_request_headers().unwrap();
        assert_eq!(stored.get("x-client-id"), Some(&value("before")));
        assert!(!stored.contains_key("x-extra"));
    }

    #[test]
    fn response_content_type_rejected_with_and_without_writer() {
        let bare = Context::new();
        assert!(bare.set_http_response_header(CONTENT_TYPE, value("x")).is_err());
        assert!(bare.add_http_response_header(CONTENT_TYPE, value("x")).is_err());

        let headers = Arc::new(ResponseHeaders::new());
        let wired = setters::with_response_writer(&bare, headers);
        assert!(wired.set_http_response_header(CONTENT_TYPE, value("x")).is_err());
    }

    #[test]
    fn response_headers_without_writer_are_a_silent_noop() {
        let ctx = Context::new();
        assert!(ctx.set_http_response_header(CACHE_CONTROL, value("no-store")).is_ok());
        assert!(ctx.add_http_response_header(CACHE_CONTROL, value("no-store")).is_ok());
    }

    #[test]
    fn set_replaces_and_add_appends_on_the_writer() {
        let headers = Arc::new(ResponseHeaders::new());
        let ctx =
            setters::with_response_writer(&Context::new(), Arc::clone(&headers) as Arc<dyn ResponseWriter>);

        ctx.set_http_response_header(CACHE_CONTROL, value("no-store")).unwrap();
        ctx.set_http_response_header(CACHE_CONTROL, value("no-cache")).unwrap();
        ctx.add_http_response_header(CACHE_CONTROL, value("private")).unwrap();

        let map = headers.take();
        let values: Vec<_> = map.get_all(CACHE_CONTROL).iter().collect();
        assert_eq!(values, [&value("no-cache"), &value("private")]);
    }
}
