//! A minimal method and path HTTP router built on hyper.
//!
//! ```no_run
//! use stout::{Context, Router};
//!
//! async fn user(ctx: Context) -> anyhow::Result<stout::hyper::Response<stout::Body>> {
//! 	ctx.text(format!("user {}", ctx.param("id").unwrap_or_default()))
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), stout::hyper::Error> {
//! 	Router::builder()
//! 		.get("/users/:id", user)
//! 		.static_file("/favicon.ico", "./assets/favicon.ico")
//! 		.build()
//! 		.run(([127, 0, 0, 1], 3000))
//! 		.await
//! }
//! ```
//!
//! Path segments written as `:name` are named parameters. They match one or more word characters
//! (`[A-Za-z0-9_]`) and are available from [`Context::param`] together with the query string and
//! url-encoded form fields; a path parameter wins over a form field of the same name.
//!
//! Requests are resolved in a fixed order:
//!
//! 1. a static file registered for exactly the request path, whatever the method;
//! 2. templated routes, in registration order. The first pattern that matches the path decides:
//!    if it was registered for another method the response is not found (see
//!    [`MethodMismatch`] to keep scanning instead);
//! 3. routes without named segments, by exact method and path.
//!
//! Anything else goes to the not found handler, which answers `404 not found` unless replaced on
//! the [`RouterBuilder`]. Handler errors go to the internal error handler.

mod context;
mod files;
mod http;
mod params;
mod pattern;
mod table;

pub use context::{Context, RemoteAddr};
pub use http::*;
pub use params::{merge, Params, DEFAULT_MAX_FORM_SIZE};
pub use pattern::{Pattern, MARKER};
pub use table::{RouteTable, StaticFiles, TemplatedRoute};

/// Various types and utilities for defining routes and route handlers.
pub mod route;

/// Contains the core structs of the router.
///
/// Use the RouterBuilder to create a Router, then run it or pass it to hyper as the service.
pub mod router;

pub use route::*;
pub use router::*;
