//! Built-in interceptors.
//!
//! Cross-cutting concerns that almost every deployment wants and nobody
//! should write twice. Each function here returns a plain [`Interceptor`] —
//! slot them into [`chain`](crate::chain) alongside your own.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};

use crate::context::Context;
use crate::interceptor::{Interceptor, Method};

/// An interceptor that logs one line per call via [`tracing`]: service,
/// method, elapsed time, and outcome (`info!` on success, `error!` with the
/// error on failure).
///
/// Call identity comes from the context, so this works unchanged on clients
/// and servers; calls whose transport adapter stamped no identity log as
/// `unknown`.
///
/// ```rust
/// # use tether::{Interceptor, chain, middleware};
/// # fn demo(auth: Interceptor<u32, u32>) {
/// // Outermost, so the logged time covers the whole stack below it.
/// let composed = chain([Some(middleware::trace()), Some(auth)]);
/// # }
/// ```
pub fn trace<Req, Resp>() -> Interceptor<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    Arc::new(|next: Method<Req, Resp>| {
        Arc::new(move |ctx: Context, req: Req| {
            let next = Arc::clone(&next);
            Box::pin(async move {
                let service = ctx.service_name().unwrap_or("unknown").to_owned();
                let method = ctx.method_name().unwrap_or("unknown").to_owned();

                let start = Instant::now();
                let result = next(ctx, req).await;
                let elapsed = start.elapsed();

                match &result {
                    Ok(_) => info!(%service, %method, ?elapsed, "rpc ok"),
                    Err(e) => error!(%service, %method, ?elapsed, error = %e, "rpc failed"),
                }
                result
            })
        })
    })
}
