use crate::params::Params;
use anyhow::Result;
use hyper::{
	header::{HeaderMap, CONTENT_TYPE, LOCATION, USER_AGENT},
	http::{request::Parts, response::Builder},
	Body, Method, StatusCode, Uri,
};
use serde::Serialize;
use std::{mem, net::SocketAddr};

/// The peer address of the connection a request arrived on.
///
/// [`HttpRouter`](crate::HttpRouter) stores it in the request extensions; services that call
/// [`Router::dispatch`](crate::Router::dispatch) themselves can insert it the same way.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RemoteAddr(pub SocketAddr);

/// Everything a handler gets to know about the request it is serving.
///
/// A context is built once per dispatched request, fully populated before the handler runs, and
/// moved into that handler. The router never touches it again.
#[derive(Debug)]
pub struct Context {
	request: Parts,
	params: Params,
	user_agent: String,
	url: String,
	body: Body,
}

impl Context {
	pub(crate) fn new(request: Parts, params: Params, body: Body) -> Self {
		let user_agent = request
			.headers
			.get(USER_AGENT)
			.and_then(|value| value.to_str().ok())
			.unwrap_or_default()
			.to_owned();
		let url = request.uri.to_string();

		Self {
			request,
			params,
			user_agent,
			url,
			body,
		}
	}

	pub fn method(&self) -> &Method {
		&self.request.method
	}

	/// The request target as received, including the query string.
	pub fn url(&self) -> &str {
		&self.url
	}

	pub fn uri(&self) -> &Uri {
		&self.request.uri
	}

	/// The `User-Agent` header, or an empty string when absent or not visible ASCII.
	pub fn user_agent(&self) -> &str {
		&self.user_agent
	}

	/// The client's socket address, when the transport recorded one.
	pub fn remote_addr(&self) -> Option<SocketAddr> {
		self.request
			.extensions
			.get::<RemoteAddr>()
			.map(|addr| addr.0)
	}

	pub fn headers(&self) -> &HeaderMap {
		&self.request.headers
	}

	/// The request head: method, URI, version, headers and extensions.
	pub fn request(&self) -> &Parts {
		&self.request
	}

	/// Looks up a merged query, form or path parameter.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name)
	}

	pub fn params(&self) -> &Params {
		&self.params
	}

	pub fn body_mut(&mut self) -> &mut Body {
		&mut self.body
	}

	/// Takes the body stream, leaving an empty body in its place.
	pub fn take_body(&mut self) -> Body {
		mem::take(&mut self.body)
	}

	pub fn into_body(self) -> Body {
		self.body
	}

	pub fn text(&self, body: impl Into<String>) -> Result<hyper::Response<Body>> {
		let body: String = body.into();
		Ok(Builder::default()
			.header(CONTENT_TYPE, "text/plain; charset=utf-8")
			.body(Body::from(body))?)
	}

	pub fn html(&self, body: impl Into<String>) -> Result<hyper::Response<Body>> {
		let body: String = body.into();
		Ok(Builder::default()
			.header(CONTENT_TYPE, "text/html; charset=utf-8")
			.body(Body::from(body))?)
	}

	pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<hyper::Response<Body>> {
		let body = serde_json::to_vec(value)?;
		Ok(Builder::default()
			.header(CONTENT_TYPE, "application/json")
			.body(Body::from(body))?)
	}

	pub fn redirect(&self, location: &str) -> Result<hyper::Response<Body>> {
		Ok(Builder::default()
			.status(StatusCode::FOUND)
			.header(LOCATION, location)
			.body(Body::empty())?)
	}
}
