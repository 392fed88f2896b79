//! Writer API for transport adapters and generated code.
//!
//! These are the functions that stamp call identity onto a [`Context`] at
//! dispatch time. Application handlers and middleware read those values back
//! through the `Context` readers; they have no reason to call anything here.
//! Keeping the writers out of `Context`'s own surface makes the asymmetry
//! hard to miss.
//!
//! Every function returns a new context derived from `ctx`; the input is
//! never mutated.

use std::sync::Arc;

use crate::context::Context;
use crate::writer::ResponseWriter;

/// Records the RPC method name, e.g. `"MakeHat"`.
pub fn with_method_name(ctx: &Context, name: impl Into<String>) -> Context {
    ctx.with_method_name(name.into())
}

/// Records the service name, e.g. `"Haberdasher"`.
pub fn with_service_name(ctx: &Context, name: impl Into<String>) -> Context {
    ctx.with_service_name(name.into())
}

/// Records the protobuf package name. Pass `""` for a proto file that
/// declares no package — readers see `Some("")`, distinct from "unknown".
pub fn with_package_name(ctx: &Context, name: impl Into<String>) -> Context {
    ctx.with_package_name(name.into())
}

/// Records the response status code, stored as a decimal string (`"200"`).
pub fn with_status_code(ctx: &Context, code: u16) -> Context {
    ctx.with_status_code(code)
}

/// Installs the response-writer handle the response-header operations write
/// through. Server-side only; client contexts never carry one.
pub fn with_response_writer(ctx: &Context, writer: Arc<dyn ResponseWriter>) -> Context {
    ctx.with_response_writer(writer)
}
