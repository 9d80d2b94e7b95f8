use crate::{context::RemoteAddr, route::Request, Router};
use hyper::{body::Body, server::conn::AddrStream, service::Service, Server};
use std::{
	convert::Infallible,
	future::{ready, Future, Ready},
	net::SocketAddr,
	pin::Pin,
	sync::Arc,
	task::{Context, Poll},
};
use tracing::info;

pub use hyper;

pub use hyper::http::response::Builder as ResponseBuilder;

/// Hands out a [`RouteHandler`] for every connection hyper accepts. All handlers share one
/// [`Router`].
#[derive(Debug, Clone)]
pub struct HttpRouter {
	router: Arc<Router>,
}

impl From<Router> for HttpRouter {
	fn from(router: Router) -> Self {
		Self {
			router: Arc::new(router),
		}
	}
}

impl<'a> Service<&'a AddrStream> for HttpRouter {
	type Response = RouteHandler;
	type Error = Infallible;
	type Future = Ready<Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, _: &mut Context) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, conn: &'a AddrStream) -> Self::Future {
		ready(Ok(RouteHandler {
			router: Arc::clone(&self.router),
			remote_addr: conn.remote_addr(),
		}))
	}
}

/// Responsible for handling the actual HTTP requests from hyper on one connection.
#[derive(Debug, Clone)]
pub struct RouteHandler {
	router: Arc<Router>,
	remote_addr: SocketAddr,
}

impl Service<Request> for RouteHandler {
	type Response = hyper::Response<Body>;
	type Error = Infallible;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

	fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, mut req: Request) -> Self::Future {
		req.extensions_mut().insert(RemoteAddr(self.remote_addr));
		let router = Arc::clone(&self.router);
		Box::pin(async move { Ok(router.dispatch(req).await) })
	}
}

impl Router {
	pub fn into_service(self) -> HttpRouter {
		HttpRouter::from(self)
	}

	/// Binds `addr` and serves until the server fails. Bind and transport errors are returned
	/// unchanged.
	pub async fn run(self, addr: impl Into<SocketAddr>) -> Result<(), hyper::Error> {
		let server = Server::try_bind(&addr.into())?.serve(self.into_service());
		info!(address = %server.local_addr(), "listening");
		server.await
	}
}
