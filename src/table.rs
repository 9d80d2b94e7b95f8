use crate::{
	pattern::{Pattern, MARKER},
	route::{Handler, RouteKey},
};
use hyper::Method;
use std::{
	collections::HashMap,
	fmt::{self, Debug, Formatter},
	path::{Path, PathBuf},
	slice,
};
use tracing::debug;

/// A route whose pattern has named segments. These are scanned in registration order.
#[derive(Clone)]
pub struct TemplatedRoute {
	pub method: Method,
	pub pattern: Pattern,
	pub handler: Handler,
}

impl Debug for TemplatedRoute {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}", self.method, self.pattern.as_str())
	}
}

#[derive(Clone, Default)]
pub struct RouteTable {
	exact: HashMap<RouteKey, Handler>,
	templated: Vec<TemplatedRoute>,
}

impl RouteTable {
	/// Stores a binding, replacing any handler already registered for the same method and
	/// pattern. A replaced templated route keeps its original position in the scan order.
	pub fn register(&mut self, method: Method, pattern: &str, handler: Handler) {
		let compiled = Pattern::compile(pattern);
		if !compiled.is_templated() {
			if pattern.contains(MARKER) {
				debug!(
					%method,
					pattern,
					"pattern has no `:name` segment and is matched literally"
				);
			}
			self.exact.insert(RouteKey::new(method, pattern), handler);
			return;
		}

		match self
			.templated
			.iter_mut()
			.find(|route| route.method == method && route.pattern == compiled)
		{
			Some(route) => route.handler = handler,
			None => self.templated.push(TemplatedRoute {
				method,
				pattern: compiled,
				handler,
			}),
		}
	}

	pub fn lookup_exact(&self, method: &Method, path: &str) -> Option<&Handler> {
		self.exact.get(&RouteKey::new(method.clone(), path))
	}

	pub fn templated(&self) -> slice::Iter<'_, TemplatedRoute> {
		self.templated.iter()
	}

	pub fn len(&self) -> usize {
		self.exact.len() + self.templated.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Debug for RouteTable {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteTable")
			.field("exact", &self.exact.keys().collect::<Vec<_>>())
			.field("templated", &self.templated)
			.finish()
	}
}

/// Literal URL paths served straight from the filesystem.
#[derive(Debug, Clone, Default)]
pub struct StaticFiles(HashMap<String, PathBuf>);

impl StaticFiles {
	pub fn insert(&mut self, url_path: impl Into<String>, file: impl Into<PathBuf>) {
		self.0.insert(url_path.into(), file.into());
	}

	pub fn get(&self, url_path: &str) -> Option<&Path> {
		self.0.get(url_path).map(PathBuf::as_path)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

#[cfg(test)]
mod test {
	use super::{RouteTable, StaticFiles};
	use crate::{handler, Context, Handler};
	use hyper::{Body, Method, Response};
	use std::{path::Path, sync::Arc};

	fn test_handler() -> Handler {
		handler(|_ctx: Context| async { Ok(Response::new(Body::empty())) })
	}

	#[test]
	fn splits_exact_and_templated() {
		let mut table = RouteTable::default();
		table.register(Method::GET, "/", test_handler());
		table.register(Method::GET, "/users", test_handler());
		table.register(Method::GET, "/users/:id", test_handler());
		table.register(Method::POST, "/users/:id", test_handler());

		assert_eq!(table.len(), 4);
		assert!(table.lookup_exact(&Method::GET, "/users").is_some());
		assert!(table.lookup_exact(&Method::POST, "/users").is_none());
		assert!(table.lookup_exact(&Method::GET, "/users/:id").is_none());

		let templated: Vec<_> = table
			.templated()
			.map(|route| (route.method.clone(), route.pattern.as_str()))
			.collect();
		assert_eq!(
			templated,
			[(Method::GET, "/users/:id"), (Method::POST, "/users/:id")]
		);
	}

	#[test]
	fn last_registration_wins() {
		let first = test_handler();
		let second = test_handler();

		let mut table = RouteTable::default();
		table.register(Method::GET, "/about", first.clone());
		table.register(Method::GET, "/about", second.clone());
		assert_eq!(table.len(), 1);
		assert!(Arc::ptr_eq(
			table.lookup_exact(&Method::GET, "/about").unwrap(),
			&second
		));

		table.register(Method::GET, "/a/:x", first.clone());
		table.register(Method::GET, "/b/:x", first.clone());
		table.register(Method::GET, "/a/:x", second.clone());
		let routes: Vec<_> = table.templated().collect();
		assert_eq!(routes.len(), 2);
		assert_eq!(routes[0].pattern.as_str(), "/a/:x");
		assert!(Arc::ptr_eq(&routes[0].handler, &second));
	}

	#[test]
	fn empty_pattern_is_exact() {
		let mut table = RouteTable::default();
		table.register(Method::GET, "", test_handler());

		assert_eq!(table.templated().count(), 0);
		assert!(table.lookup_exact(&Method::GET, "/").is_none());
	}

	#[test]
	fn marker_with_suffix_is_literal() {
		let mut table = RouteTable::default();
		table.register(Method::GET, "/files/:name.json", test_handler());

		assert_eq!(table.templated().count(), 0);
		assert!(table
			.lookup_exact(&Method::GET, "/files/:name.json")
			.is_some());
		assert!(table
			.lookup_exact(&Method::GET, "/files/readme.json")
			.is_none());
	}

	#[test]
	fn static_files_are_exact() {
		let mut files = StaticFiles::default();
		files.insert("/favicon.ico", "./assets/favicon.ico");

		assert_eq!(
			files.get("/favicon.ico"),
			Some(Path::new("./assets/favicon.ico"))
		);
		assert_eq!(files.get("/favicon.ico/"), None);
		assert_eq!(files.len(), 1);
	}
}
