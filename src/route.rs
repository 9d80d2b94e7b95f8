use crate::Context;
use anyhow::Result;
pub use hyper::{header, Body, Method, StatusCode};
use std::{future::Future, pin::Pin, sync::Arc};

pub type Request = hyper::Request<Body>;
pub type Response = Pin<Box<dyn Future<Output = Result<hyper::Response<Body>>> + Send>>;

/// A registered route handler. Handlers receive the request context by value and resolve to the
/// response that is sent back to the client.
pub type Handler = Arc<dyn Fn(Context) -> Response + Send + Sync>;

/// Boxes an async function or closure into a [`Handler`].
pub fn handler<F, Fut>(f: F) -> Handler
where
	F: Fn(Context) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<hyper::Response<Body>>> + Send + 'static,
{
	Arc::new(move |ctx| Box::pin(f(ctx)))
}

/// Identifies one binding in the exact-match table.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct RouteKey {
	pub method: Method,
	pub path: String,
}

impl RouteKey {
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
		}
	}
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum PathSegment {
	/// Matches exactly this text.
	Static(String),
	/// Matches one or more word characters and captures them under this name.
	Named(String),
}
