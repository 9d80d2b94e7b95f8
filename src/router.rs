use crate::{
	context::Context,
	files,
	params::{self, Params, DEFAULT_MAX_FORM_SIZE},
	route::{handler, Handler, Request},
	table::{RouteTable, StaticFiles},
};
use anyhow::{Error, Result};
use hyper::{
	body::Body,
	http::{Method, StatusCode},
	Response,
};
use std::{future::Future, path::Path};
use tracing::{debug, warn};

pub type InternalErrorHandler = fn(e: Error) -> Response<Body>;
fn default_error_handler(e: Error) -> Response<Body> {
	let mut res = Response::new(Body::from(e.to_string()));
	*res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
	res
}

pub type NotFoundHandler = fn(req: Request) -> Response<Body>;
fn default_not_found_handler(_req: Request) -> Response<Body> {
	let mut res = Response::new(Body::from("not found"));
	*res.status_mut() = StatusCode::NOT_FOUND;
	res
}

fn payload_too_large() -> Response<Body> {
	let mut res = Response::new(Body::from("request entity too large"));
	*res.status_mut() = StatusCode::PAYLOAD_TOO_LARGE;
	res
}

/// What to do when a templated route matches the path but was registered for another method.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MethodMismatch {
	/// Stop scanning and respond with not found, without consulting later templated routes or the
	/// exact table.
	NotFound,
	/// Keep scanning the remaining templated routes, then the exact table.
	Continue,
}

impl Default for MethodMismatch {
	fn default() -> Self {
		MethodMismatch::NotFound
	}
}

#[derive(Debug, Default)]
pub struct RouterBuilder {
	routes: RouteTable,
	files: StaticFiles,
	pub internal_error_handler: Option<InternalErrorHandler>,
	pub not_found_handler: Option<NotFoundHandler>,
	pub method_mismatch: MethodMismatch,
	pub max_form_size: Option<u64>,
}

impl RouterBuilder {
	/// Binds `handler` to `method` and `pattern`. Patterns may contain named segments such as
	/// `/users/:id`; registering the same method and pattern again replaces the handler.
	#[must_use]
	pub fn register<F, Fut>(mut self, method: Method, pattern: &str, route: F) -> Self
	where
		F: Fn(Context) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Response<Body>>> + Send + 'static,
	{
		self.routes.register(method, pattern, handler(route));
		self
	}

	#[must_use]
	pub fn get<F, Fut>(self, pattern: &str, route: F) -> Self
	where
		F: Fn(Context) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Response<Body>>> + Send + 'static,
	{
		self.register(Method::GET, pattern, route)
	}

	#[must_use]
	pub fn post<F, Fut>(self, pattern: &str, route: F) -> Self
	where
		F: Fn(Context) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Response<Body>>> + Send + 'static,
	{
		self.register(Method::POST, pattern, route)
	}

	#[must_use]
	pub fn put<F, Fut>(self, pattern: &str, route: F) -> Self
	where
		F: Fn(Context) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Response<Body>>> + Send + 'static,
	{
		self.register(Method::PUT, pattern, route)
	}

	#[must_use]
	pub fn delete<F, Fut>(self, pattern: &str, route: F) -> Self
	where
		F: Fn(Context) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Response<Body>>> + Send + 'static,
	{
		self.register(Method::DELETE, pattern, route)
	}

	/// Serves the file at `file` for requests to exactly `url_path`, whatever the method. Static
	/// files shadow every route registered for the same path.
	#[must_use]
	pub fn static_file(mut self, url_path: &str, file: impl AsRef<Path>) -> Self {
		self.files.insert(url_path, file.as_ref());
		self
	}

	#[must_use]
	pub fn internal_error_handler(mut self, handler: InternalErrorHandler) -> Self {
		self.internal_error_handler = Some(handler);
		self
	}

	#[must_use]
	pub fn not_found_handler(mut self, handler: NotFoundHandler) -> Self {
		self.not_found_handler = Some(handler);
		self
	}

	#[must_use]
	pub fn method_mismatch(mut self, policy: MethodMismatch) -> Self {
		self.method_mismatch = policy;
		self
	}

	/// Caps the url-encoded form bodies read for parameters. Larger submissions are answered with
	/// `413 Payload Too Large` before any handler runs. Defaults to 10 MiB.
	#[must_use]
	pub fn max_form_size(mut self, bytes: u64) -> Self {
		self.max_form_size = Some(bytes);
		self
	}

	pub fn build(self) -> Router {
		debug!(
			routes = self.routes.len(),
			files = self.files.len(),
			"router built"
		);

		Router {
			routes: self.routes,
			files: self.files,
			internal_error: self.internal_error_handler.unwrap_or(default_error_handler),
			not_found: self.not_found_handler.unwrap_or(default_not_found_handler),
			method_mismatch: self.method_mismatch,
			max_form_size: self.max_form_size.unwrap_or(DEFAULT_MAX_FORM_SIZE),
		}
	}
}

/// Where a request is headed, decided from its method and path alone.
pub(crate) enum Resolution<'a> {
	File(&'a Path),
	Route {
		handler: &'a Handler,
		path_params: Option<Params>,
	},
	NotFound,
}

/// An immutable set of routes and static files. Build one with [`RouterBuilder`], then either
/// [`run`](Router::run) it or hand [`into_service`](Router::into_service) to a hyper server.
#[derive(Debug)]
pub struct Router {
	routes: RouteTable,
	files: StaticFiles,
	internal_error: InternalErrorHandler,
	not_found: NotFoundHandler,
	method_mismatch: MethodMismatch,
	max_form_size: u64,
}

impl Router {
	pub fn builder() -> RouterBuilder {
		RouterBuilder::default()
	}

	pub fn routes(&self) -> &RouteTable {
		&self.routes
	}

	pub fn static_files(&self) -> &StaticFiles {
		&self.files
	}

	pub fn method_mismatch(&self) -> MethodMismatch {
		self.method_mismatch
	}

	pub fn max_form_size(&self) -> u64 {
		self.max_form_size
	}

	pub(crate) fn resolve<'a>(&'a self, method: &Method, path: &str) -> Resolution<'a> {
		if let Some(file) = self.files.get(path) {
			return Resolution::File(file);
		}

		for route in self.routes.templated() {
			let path_params = match route.pattern.match_path(path) {
				Some(params) => params,
				None => continue,
			};

			if route.method != *method {
				debug!(
					%method,
					path,
					pattern = route.pattern.as_str(),
					registered = %route.method,
					"method mismatch on templated route"
				);

				match self.method_mismatch {
					MethodMismatch::NotFound => return Resolution::NotFound,
					MethodMismatch::Continue => continue,
				}
			}

			return Resolution::Route {
				handler: &route.handler,
				path_params: Some(path_params),
			};
		}

		match self.routes.lookup_exact(method, path) {
			Some(handler) => Resolution::Route {
				handler,
				path_params: None,
			},
			None => Resolution::NotFound,
		}
	}

	/// Routes one request and produces its response. Exactly one of three things happens: a
	/// static file is served, a single handler is invoked, or the not found handler responds.
	pub async fn dispatch(&self, req: Request) -> Response<Body> {
		let method = req.method().clone();
		let path = req.uri().path().to_owned();

		match self.resolve(&method, &path) {
			Resolution::File(file) => {
				debug!(%method, path = %path, file = %file.display(), "serving static file");

				match files::serve_file(file).await {
					Ok(res) => res,
					Err(e) if files::is_not_found(&e) => {
						warn!(error = %e, file = %file.display(), "static file missing");
						(self.not_found)(req)
					}
					Err(e) => {
						warn!(error = %e, file = %file.display(), "static file unreadable");
						(self.internal_error)(e)
					}
				}
			}
			Resolution::Route {
				handler,
				path_params,
			} => {
				let (parts, body) = req.into_parts();
				let (form, body) =
					match params::read_form(&parts, body, self.max_form_size).await {
						Ok(form) => form,
						Err(_) => return payload_too_large(),
					};
				let params = match path_params {
					Some(path_params) => params::merge(&form, &path_params),
					None => form,
				};

				debug!(%method, path = %path, params = params.len(), "invoking handler");
				match handler(Context::new(parts, params, body)).await {
					Ok(res) => res,
					Err(e) => {
						warn!(error = %e, %method, path = %path, "handler failed");
						(self.internal_error)(e)
					}
				}
			}
			Resolution::NotFound => {
				debug!(%method, path = %path, "no route matched");
				(self.not_found)(req)
			}
		}
	}
}

impl From<RouterBuilder> for Router {
	fn from(builder: RouterBuilder) -> Self {
		builder.build()
	}
}
