use hyper::{
	body::HttpBody,
	header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE},
	http::request::Parts,
	Body, Method,
};
use std::{
	collections::{hash_map, HashMap},
	iter::FromIterator,
	str::FromStr,
};
use tracing::warn;
use url::form_urlencoded;

/// Largest url-encoded form body read for parameters unless the builder sets another limit.
pub const DEFAULT_MAX_FORM_SIZE: u64 = 10 << 20;

/// A url-encoded form body that exceeded the configured size limit.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) struct FormTooLarge {
	pub(crate) limit: u64,
}

/// Request parameters keyed by name.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Params(HashMap<String, String>);

impl Params {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	/// Parses a parameter into `T`, returning `None` when it is missing or malformed.
	pub fn parse<T: FromStr>(&self, name: &str) -> Option<T> {
		self.get(name).and_then(|value| value.parse().ok())
	}

	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
		self.0.insert(name.into(), value.into())
	}

	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Parses `application/x-www-form-urlencoded` input. Only the first value of a repeated key
	/// is kept.
	pub fn from_urlencoded(input: &[u8]) -> Self {
		let mut params = Self::new();
		for (name, value) in form_urlencoded::parse(input) {
			if let hash_map::Entry::Vacant(entry) = params.0.entry(name.into_owned()) {
				entry.insert(value.into_owned());
			}
		}
		params
	}

	fn overlay(&mut self, other: &Params) {
		self.0
			.extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
	}
}

impl<K, V> FromIterator<(K, V)> for Params
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(
			iter.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		)
	}
}

impl IntoIterator for Params {
	type Item = (String, String);
	type IntoIter = hash_map::IntoIter<String, String>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

/// Combines query/form parameters with parameters extracted from the route path. Path parameters
/// win on collision.
pub fn merge(form: &Params, path: &Params) -> Params {
	let mut merged = form.clone();
	merged.overlay(path);
	merged
}

fn is_form_body(parts: &Parts) -> bool {
	let has_body = matches!(parts.method, Method::POST | Method::PUT | Method::PATCH);
	let content_type = parts
		.headers
		.get(CONTENT_TYPE)
		.and_then(|value: &HeaderValue| value.to_str().ok())
		.and_then(|value| value.split(';').next())
		.map(str::trim);

	has_body
		&& content_type.map_or(false, |mime| {
			mime.eq_ignore_ascii_case("application/x-www-form-urlencoded")
		})
}

fn content_length(parts: &Parts) -> Option<u64> {
	parts
		.headers
		.get(CONTENT_LENGTH)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.trim().parse().ok())
}

/// Buffers the body, giving up with `None` as soon as it is known to be larger than `limit`.
async fn read_limited(mut body: Body, limit: u64) -> hyper::Result<Option<Vec<u8>>> {
	if body.size_hint().lower() > limit {
		return Ok(None);
	}

	let mut buf = Vec::new();
	while let Some(chunk) = body.data().await {
		let chunk = chunk?;
		if (buf.len() + chunk.len()) as u64 > limit {
			return Ok(None);
		}
		buf.extend_from_slice(&chunk);
	}

	Ok(Some(buf))
}

/// Collects the query string parameters and, for url-encoded form submissions, the body
/// parameters, which take precedence over the query. A consumed body is handed back as a fresh
/// [`Body`] holding the same bytes. Form bodies larger than `limit` bytes are rejected.
pub(crate) async fn read_form(
	parts: &Parts,
	body: Body,
	limit: u64,
) -> Result<(Params, Body), FormTooLarge> {
	let mut params = parts
		.uri
		.query()
		.map(|query| Params::from_urlencoded(query.as_bytes()))
		.unwrap_or_default();

	if !is_form_body(parts) {
		return Ok((params, body));
	}

	let declared = content_length(parts);
	let read = match declared {
		Some(len) if len > limit => Ok(None),
		_ => read_limited(body, limit).await,
	};

	match read {
		Ok(Some(bytes)) => {
			params.overlay(&Params::from_urlencoded(&bytes));
			Ok((params, Body::from(bytes)))
		}
		Ok(None) => {
			warn!(limit, content_length = ?declared, uri = %parts.uri, "form body too large");
			Err(FormTooLarge { limit })
		}
		Err(e) => {
			warn!(error = %e, uri = %parts.uri, "failed to read form body");
			Ok((params, Body::empty()))
		}
	}
}
