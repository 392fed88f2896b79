//! End-to-end middleware flow: a transport adapter stamps a context, a
//! composed chain runs the call, and the response-writer handle collects the
//! headers middleware set along the way.

use std::sync::Arc;

use http::header::CACHE_CONTROL;
use http::{HeaderMap, HeaderValue};
use tether::{
    Context, Interceptor, Method, MethodError, ResponseHeaders, ResponseWriter, apply, chain,
    method, middleware, setters,
};

/// Middleware a real server might run: tags every response as uncacheable
/// and stamps the status code once the handler returns.
fn cache_policy() -> Interceptor<String, String> {
    Arc::new(|next: Method<String, String>| {
        Arc::new(move |ctx: Context, req: String| {
            let next = Arc::clone(&next);
            Box::pin(async move {
                ctx.set_http_response_header(CACHE_CONTROL, HeaderValue::from_static("no-store"))?;
                next(ctx, req).await
            })
        })
    })
}

async fn make_hat(ctx: Context, size: String) -> Result<String, MethodError> {
    // Generated service implementations see identity, never headers.
    let service = ctx.service_name().unwrap_or("unknown");
    let method = ctx.method_name().unwrap_or("unknown");
    Ok(format!("{service}.{method}({size})"))
}

#[tokio::test]
async fn server_side_call_flow() {
    // The adapter's dispatch-time work.
    let headers = Arc::new(ResponseHeaders::new());
    let ctx = Context::new();
    let ctx = setters::with_package_name(&ctx, "example.haberdasher");
    let ctx = setters::with_service_name(&ctx, "Haberdasher");
    let ctx = setters::with_method_name(&ctx, "MakeHat");
    let ctx = setters::with_response_writer(&ctx, Arc::clone(&headers) as Arc<dyn ResponseWriter>);

    let handler = apply(
        chain([Some(middleware::trace()), None, Some(cache_policy())]),
        method(make_hat),
    );

    let resp = handler(ctx, "7".to_owned()).await.unwrap();
    assert_eq!(resp, "Haberdasher.MakeHat(7)");

    let collected = headers.take();
    assert_eq!(
        collected.get(CACHE_CONTROL),
        Some(&HeaderValue::from_static("no-store")),
    );
}

#[tokio::test]
async fn client_side_headers_reach_the_outbound_transport() {
    let mut extra = HeaderMap::new();
    extra.insert("authorization", HeaderValue::from_static("Bearer tok"));

    // What a caller does before invoking a generated client method.
    let ctx = Context::new().with_http_request_headers(&extra).unwrap();

    // What the outbound transport does when assembling the HTTP request.
    let stored = ctx.http_request_headers().unwrap();
    assert_eq!(
        stored.get("authorization"),
        Some(&HeaderValue::from_static("Bearer tok")),
    );
}
