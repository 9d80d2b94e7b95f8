use crate::{params::Params, route::PathSegment};

/// Prefix that turns a path segment into a named parameter, as in `/users/:id`.
pub const MARKER: char = ':';

fn is_word(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_'
}

fn is_word_segment(segment: &str) -> bool {
	!segment.is_empty() && segment.chars().all(is_word)
}

impl PathSegment {
	/// A segment is named only if the whole segment is the marker followed by word characters.
	/// Anything else, including a lone `:`, is kept as literal text.
	pub fn parse(segment: &str) -> Self {
		match segment.strip_prefix(MARKER) {
			Some(name) if is_word_segment(name) => PathSegment::Named(name.to_owned()),
			_ => PathSegment::Static(segment.to_owned()),
		}
	}

	pub fn matches(&self, segment: &str) -> bool {
		match self {
			PathSegment::Static(text) => text == segment,
			PathSegment::Named(_) => is_word_segment(segment),
		}
	}
}

/// A route path split into segments on `/`.
///
/// Matching is positional: the request path must have exactly as many segments as the pattern,
/// every static segment must be equal, and every named segment must be non-empty word characters.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Pattern {
	source: String,
	segments: Vec<PathSegment>,
}

impl Pattern {
	pub fn compile(pattern: &str) -> Self {
		Self {
			source: pattern.to_owned(),
			segments: pattern.split('/').map(PathSegment::parse).collect(),
		}
	}

	pub fn as_str(&self) -> &str {
		&self.source
	}

	pub fn segments(&self) -> &[PathSegment] {
		&self.segments
	}

	/// Whether the pattern has at least one named segment. Patterns without one are routed by
	/// exact lookup instead.
	pub fn is_templated(&self) -> bool {
		self.segments
			.iter()
			.any(|segment| matches!(segment, PathSegment::Named(_)))
	}

	/// Parameter names in left-to-right segment order.
	pub fn param_names(&self) -> impl Iterator<Item = &str> {
		self.segments.iter().filter_map(|segment| match segment {
			PathSegment::Named(name) => Some(name.as_str()),
			PathSegment::Static(_) => None,
		})
	}

	/// Matches a request path (without query string) and extracts the named segments.
	pub fn match_path(&self, path: &str) -> Option<Params> {
		let parts: Vec<&str> = path.split('/').collect();
		if parts.len() != self.segments.len() {
			return None;
		}

		let mut params = Params::new();
		for (segment, part) in self.segments.iter().zip(parts) {
			if !segment.matches(part) {
				return None;
			}

			if let PathSegment::Named(name) = segment {
				params.insert(name.clone(), part);
			}
		}

		Some(params)
	}
}

#[cfg(test)]
mod test {
	use super::Pattern;
	use crate::PathSegment;

	#[test]
	fn compiles_segments() {
		let pattern = Pattern::compile("/posts/:post_id/comments/:id");

		assert_eq!(
			pattern.segments(),
			&[
				PathSegment::Static(String::new()),
				PathSegment::Static("posts".into()),
				PathSegment::Named("post_id".into()),
				PathSegment::Static("comments".into()),
				PathSegment::Named("id".into()),
			]
		);
		assert_eq!(pattern.param_names().collect::<Vec<_>>(), ["post_id", "id"]);
		assert!(pattern.is_templated());
	}

	#[test]
	fn malformed_markers_are_literal() {
		for source in &["/", "", "/users", "/a/:", "/a/b:c", "/a/:x-y"] {
			let pattern = Pattern::compile(source);
			assert!(!pattern.is_templated(), "{} should be exact", source);
		}

		let pattern = Pattern::compile("/a/:/:b");
		assert!(pattern.match_path("/a/:/x").is_some());
		assert!(pattern.match_path("/a/z/x").is_none());
	}

	#[test]
	fn extracts_params() {
		let pattern = Pattern::compile("/posts/:post_id/comments/:id");
		let params = pattern.match_path("/posts/42/comments/7").unwrap();

		assert_eq!(params.get("post_id"), Some("42"));
		assert_eq!(params.get("id"), Some("7"));
		assert_eq!(params.len(), 2);
	}

	#[test]
	fn value_equal_to_literal_is_positional() {
		let pattern = Pattern::compile("/users/:id");
		let params = pattern.match_path("/users/users").unwrap();
		assert_eq!(params.get("id"), Some("users"));
	}

	#[test]
	fn rejects_segment_count_mismatch() {
		let pattern = Pattern::compile("/users/:id");

		assert!(pattern.match_path("/users").is_none());
		assert!(pattern.match_path("/users/1/2").is_none());
		assert!(pattern.match_path("/users/1/").is_none());
		assert!(pattern.match_path("").is_none());
	}

	#[test]
	fn named_segments_only_accept_word_characters() {
		let pattern = Pattern::compile("/users/:id");

		assert!(pattern.match_path("/users/").is_none());
		assert!(pattern.match_path("/users/a-b").is_none());
		assert!(pattern.match_path("/users/a.b").is_none());
		assert!(pattern.match_path("/users/A_9").is_some());
	}

	#[test]
	fn static_segments_are_exact() {
		let pattern = Pattern::compile("/users/:id/edit");

		assert!(pattern.match_path("/users/1/edit").is_some());
		assert!(pattern.match_path("/users/1/Edit").is_none());
		assert!(pattern.match_path("/people/1/edit").is_none());
	}
}
