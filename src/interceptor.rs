//! Interceptors and chain composition.
//!
//! An [`Interceptor`] is middleware for tether RPCs, installable on both
//! clients and servers: a pure transformation from one [`Method`] to another
//! with the same signature. Just like HTTP middleware, interceptors can
//! observe and mutate requests and responses — powerful, and correspondingly
//! easy to turn into code that is hard to debug. Use with care.
//!
//! # How handlers are erased
//!
//! Generated stubs expose every RPC as
//! `async fn(Context, Req) -> Result<Resp, MethodError>`. To let one
//! interceptor wrap any such function, the concrete future type is hidden
//! behind `Arc<dyn Fn(…) -> BoxFuture<…>>` — the same pinned-box erasure any
//! async framework uses to store handlers of different types uniformly.
//! [`method`] performs the lift; the cost per call is one `Arc` clone and one
//! boxed future.
//!
//! # Writing one
//!
//! ```rust
//! use std::sync::Arc;
//! use tether::{Interceptor, Method};
//!
//! fn announce<Req, Resp>() -> Interceptor<Req, Resp>
//! where
//!     Req: Send + 'static,
//!     Resp: Send + 'static,
//! {
//!     Arc::new(|next: Method<Req, Resp>| {
//!         Arc::new(move |ctx, req| {
//!             let next = Arc::clone(&next);
//!             Box::pin(async move {
//!                 // runs before the wrapped handler …
//!                 let resp = next(ctx, req).await;
//!                 // … and after it returns
//!                 resp
//!             })
//!         })
//!     })
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::Context;

// ── Method ────────────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future, pinned so the runtime can poll it
/// in place.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// The error half of a method's return value. The chain never inspects it —
/// a failure produced anywhere propagates unchanged through every wrapping
/// layer unless an interceptor explicitly chooses to handle it.
pub type MethodError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A tether-generated RPC method: `(Context, request) -> (response, error)`.
///
/// Every generated client and server stub conforms to this shape, which is
/// what keeps interceptors composable with all of them.
pub type Method<Req, Resp> =
    Arc<dyn Fn(Context, Req) -> BoxFuture<Result<Resp, MethodError>> + Send + Sync + 'static>;

/// Middleware: wraps a [`Method`], producing another with the same signature.
pub type Interceptor<Req, Resp> =
    Arc<dyn Fn(Method<Req, Resp>) -> Method<Req, Resp> + Send + Sync + 'static>;

/// Lifts an async function with the generated-stub signature into a
/// [`Method`].
///
/// ```rust
/// use tether::{Context, MethodError, method};
///
/// async fn make_hat(_ctx: Context, size: u32) -> Result<String, MethodError> {
///     Ok(format!("hat of size {size}"))
/// }
///
/// let terminal = method(make_hat);
/// ```
pub fn method<F, Fut, Req, Resp>(f: F) -> Method<Req, Resp>
where
    F: Fn(Context, Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Resp, MethodError>> + Send + 'static,
{
    Arc::new(move |ctx, req| Box::pin(f(ctx, req)))
}

// ── Chain ─────────────────────────────────────────────────────────────────────

/// Composes interceptors into one, preserving order.
///
/// `None` entries are filtered out (an interceptor that is only installed
/// under some configuration slots in as `None` otherwise). If nothing
/// remains the result is `None` — pass-through; a single survivor is
/// returned unchanged rather than pointlessly wrapped.
///
/// The first interceptor in the list is the outermost layer: it sees the
/// request first and the response last.
///
/// ```rust
/// # use tether::{Interceptor, chain};
/// # fn demo(a: Interceptor<u32, u32>, b: Option<Interceptor<u32, u32>>) {
/// let composed = chain([Some(a), b]);
/// # }
/// ```
///
/// Composition itself is pure and cannot fail; errors only ever surface when
/// the composed method is invoked.
pub fn chain<Req, Resp>(
    interceptors: impl IntoIterator<Item = Option<Interceptor<Req, Resp>>>,
) -> Option<Interceptor<Req, Resp>>
where
    Req: 'static,
    Resp: 'static,
{
    let mut filtered: Vec<_> = interceptors.into_iter().flatten().collect();
    match filtered.len() {
        0 | 1 => filtered.pop(),
        _ => Some(Arc::new(move |mut next: Method<Req, Resp>| {
            // Right fold from the terminal outward: the last interceptor
            // wraps `next` first and ends up innermost.
            for layer in filtered[1..].iter().rev() {
                next = layer(next);
            }
            (filtered[0])(next)
        })),
    }
}

/// Wraps `terminal` in `interceptor`, treating `None` as pass-through.
///
/// Convenience for the `Option` that [`chain`] returns:
///
/// ```rust
/// # use tether::{Context, Interceptor, MethodError, apply, chain, method};
/// # fn demo(interceptors: Vec<Option<Interceptor<u32, u32>>>) {
/// async fn double(_ctx: Context, n: u32) -> Result<u32, MethodError> {
///     Ok(n * 2)
/// }
///
/// let handler = apply(chain(interceptors), method(double));
/// # }
/// ```
pub fn apply<Req, Resp>(
    interceptor: Option<Interceptor<Req, Resp>>,
    terminal: Method<Req, Resp>,
) -> Method<Req, Resp> {
    match interceptor {
        Some(interceptor) => interceptor(terminal),
        None => terminal,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
