//! # tether
//!
//! Runtime support for tether-generated RPC clients and servers.
//! Nothing more. Nothing less.
//!
//! ## The contract
//!
//! The code generator emits client and server stubs from your `.proto`
//! files; the transport layer moves bytes. tether is the thin layer both of
//! them lean on at runtime — by design it contains only the two pieces that
//! actually change between frameworks:
//!
//! - **A per-call metadata [`Context`]** — immutable and cheaply shareable,
//!   carrying call identity (service, method, protobuf package), response
//!   status, outbound request headers, and the response-writer handle.
//!   Writes layer a new context over the old one, so concurrent calls never
//!   interfere and nothing needs a lock.
//! - **[`Interceptor`] composition** — middleware as a pure transformation
//!   of one [`Method`] into another, with [`chain`] collapsing an ordered
//!   list of them into a single handler, onion-style.
//!
//! What the collaborators own — tether intentionally ignores:
//!
//! - **Wire encoding, routing, socket I/O** — the transport layer
//! - **Stub generation** — `protoc-gen-tether`, at build time
//! - **Retry, timeout, cancellation policy** — the transport and the host
//!   runtime (dropping a call's future cancels everything under it)
//!
//! ## Quick start
//!
//! ```rust
//! use tether::{Context, MethodError, apply, chain, method, middleware, setters};
//!
//! async fn make_hat(_ctx: Context, size: u32) -> Result<String, MethodError> {
//!     Ok(format!("a size-{size} bowler"))
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! // What a transport adapter does at dispatch time:
//! let ctx = setters::with_service_name(&Context::new(), "Haberdasher");
//! let ctx = setters::with_method_name(&ctx, "MakeHat");
//!
//! let handler = apply(chain([Some(middleware::trace())]), method(make_hat));
//! let hat = handler(ctx, 7).await.unwrap();
//! assert_eq!(hat, "a size-7 bowler");
//! # }
//! ```

mod error;
mod interceptor;
mod writer;

pub mod context;
pub mod middleware;
pub mod setters;

pub use context::{Context, RESERVED_REQUEST_HEADERS, RESERVED_RESPONSE_HEADERS, VERSION_HEADER};
pub use error::ReservedHeaderError;
pub use interceptor::{BoxFuture, Interceptor, Method, MethodError, apply, chain, method};
pub use writer::{ResponseHeaders, ResponseWriter};
