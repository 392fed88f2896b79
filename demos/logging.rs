//! Minimal tether example — a two-layer interceptor chain around one RPC.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example logging
//!
//! Shows the three moving parts a transport adapter wires together:
//!   1. stamp call identity onto a fresh Context (setters::*)
//!   2. compose middleware around the generated method (chain + apply)
//!   3. invoke the composed handler like any other method

use std::sync::Arc;

use tether::{Context, Interceptor, Method, MethodError, apply, chain, method, middleware, setters};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // middleware::trace() goes first: outermost, so its timing covers
    // everything below it. reject_oversize() only sees calls trace let through.
    let handler = apply(
        chain([Some(middleware::trace()), Some(reject_oversize(20))]),
        method(make_hat),
    );

    // A transport adapter does this once per inbound call.
    let ctx = setters::with_service_name(&Context::new(), "Haberdasher");
    let ctx = setters::with_method_name(&ctx, "MakeHat");

    println!("{}", handler(ctx.clone(), 7).await.unwrap());
    println!("{:?}", handler(ctx, 99).await.unwrap_err().to_string());
}

// The terminal handler — in real use, a tether-generated stub.
async fn make_hat(_ctx: Context, size: u32) -> Result<String, MethodError> {
    Ok(format!("a size-{size} bowler"))
}

// A hand-written interceptor: validation before the handler ever runs.
fn reject_oversize(max: u32) -> Interceptor<u32, String> {
    Arc::new(move |next: Method<u32, String>| {
        Arc::new(move |ctx, size| {
            let next = Arc::clone(&next);
            Box::pin(async move {
                if size > max {
                    return Err(format!("no hat is a size {size}").into());
                }
                next(ctx, size).await
            })
        })
    })
}
