use anyhow::Result;
use hyper::{
	header::{CONTENT_LENGTH, CONTENT_TYPE},
	http::response::Builder,
	Body,
};
use std::{
	io::{self, ErrorKind},
	path::Path,
};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

/// Streams the file at `path` as a response body, with a content type guessed from its extension.
pub(crate) async fn serve_file(path: &Path) -> Result<hyper::Response<Body>> {
	let file = File::open(path).await?;
	let metadata = file.metadata().await?;
	if !metadata.is_file() {
		return Err(io::Error::new(ErrorKind::NotFound, "not a regular file").into());
	}

	let mime = mime_guess::from_path(path).first_or_octet_stream();
	Ok(Builder::default()
		.header(CONTENT_TYPE, mime.as_ref())
		.header(CONTENT_LENGTH, metadata.len())
		.body(Body::wrap_stream(ReaderStream::new(file)))?)
}

pub(crate) fn is_not_found(e: &anyhow::Error) -> bool {
	e.downcast_ref::<io::Error>()
		.map_or(false, |e| e.kind() == ErrorKind::NotFound)
}

#[cfg(test)]
mod test {
	use super::{is_not_found, serve_file};
	use hyper::{body, header::CONTENT_TYPE};
	use std::io::Write;

	#[tokio::test]
	async fn streams_file_with_mime_type() {
		let mut file = tempfile::Builder::new().suffix(".css").tempfile().unwrap();
		file.write_all(b"body { margin: 0 }").unwrap();

		let res = serve_file(file.path()).await.unwrap();
		assert_eq!(res.headers()[CONTENT_TYPE], "text/css");
		assert_eq!(
			body::to_bytes(res.into_body()).await.unwrap(),
			"body { margin: 0 }"
		);
	}

	#[tokio::test]
	async fn missing_file_is_not_found() {
		let dir = tempfile::tempdir().unwrap();

		let err = serve_file(&dir.path().join("nope.txt")).await.unwrap_err();
		assert!(is_not_found(&err));

		let err = serve_file(dir.path()).await.unwrap_err();
		assert!(is_not_found(&err));
	}
}
