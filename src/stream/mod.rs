//! File streaming with HTTP range support.
//!
//! Serves a resolved file either whole (200) or as a single byte range
//! (206). Bodies are lazy and single-use: the open file handle is owned
//! by the response body and is closed when the body is dropped, whether
//! it ran to completion, hit an I/O error, or the client disconnected.

pub mod range;

pub use range::ByteRange;

use std::io;
use std::path::Path;

use axum::body::Body;
use axum::http::header::{
    ACCEPT_RANGES, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE,
};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, SeekFrom};
use tokio_util::io::ReaderStream;

use crate::{FilegateError, Result};

/// Read buffer size for range-limited bodies.
const READ_CHUNK: usize = 64 * 1024;

/// Serve a file, honoring an optional `Range` header value.
///
/// Directories are refused with `NotStreamable`; an unsatisfiable or
/// malformed range surfaces as `RangeNotSatisfiable` for the caller to
/// turn into a 416 via [`not_satisfiable_response`].
pub async fn serve(path: &Path, range_header: Option<&str>) -> Result<Response> {
    let metadata = tokio::fs::metadata(path).await.map_err(not_found)?;
    if metadata.is_dir() {
        return Err(FilegateError::NotStreamable(display_name(path)));
    }
    let size = metadata.len();

    match range_header {
        Some(header) => {
            let range = range::parse(header, size)?;

            let mut file = File::open(path).await.map_err(not_found)?;
            file.seek(SeekFrom::Start(range.start)).await?;

            partial_response(path, range, size, exact_body(file, range.len()))
        }
        None => {
            let file = File::open(path).await.map_err(not_found)?;
            let body = Body::from_stream(ReaderStream::new(file));

            full_response(path, size, body)
        }
    }
}

/// Build the 416 reply for an unsatisfiable range against `size` bytes.
pub fn not_satisfiable_response(size: u64) -> Response {
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(ACCEPT_RANGES, "bytes")
        .header(CONTENT_RANGE, format!("bytes */{size}"))
        .header(CONTENT_LENGTH, "0")
        .body(Body::empty())
        .unwrap_or_else(|_| StatusCode::RANGE_NOT_SATISFIABLE.into_response())
}

/// Guess a Content-Type from the file extension, octet-stream fallback.
pub fn content_type_for(path: &Path) -> HeaderValue {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    HeaderValue::from_str(mime.as_ref())
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"))
}

fn full_response(path: &Path, size: u64, body: Body) -> Result<Response> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type_for(path))
        .header(CONTENT_LENGTH, size)
        .header(ACCEPT_RANGES, "bytes")
        .header(CACHE_CONTROL, "no-cache")
        .body(body)
        .map_err(build_error)
}

fn partial_response(path: &Path, range: ByteRange, size: u64, body: Body) -> Result<Response> {
    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(CONTENT_TYPE, content_type_for(path))
        .header(
            CONTENT_RANGE,
            format!("bytes {}-{}/{}", range.start, range.end, size),
        )
        .header(CONTENT_LENGTH, range.len())
        .header(ACCEPT_RANGES, "bytes")
        .header(CACHE_CONTROL, "no-cache")
        .body(body)
        .map_err(build_error)
}

/// Body yielding exactly `len` bytes from the file's current position.
///
/// The final read is truncated to the remaining budget so the body never
/// over-delivers; a premature end of file is an error, not a short body.
fn exact_body(file: File, len: u64) -> Body {
    Body::from_stream(read_exactly(file, len))
}

fn read_exactly(mut file: File, len: u64) -> impl futures::Stream<Item = io::Result<Bytes>> {
    async_stream::try_stream! {
        let mut remaining = len;
        let mut buf = vec![0u8; READ_CHUNK];

        while remaining > 0 {
            let n = file.read(&mut buf).await?;
            if n == 0 {
                Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "file ended before the requested range",
                ))?;
            }
            let take = remaining.min(n as u64) as usize;
            remaining -= take as u64;
            yield Bytes::copy_from_slice(&buf[..take]);
        }
    }
}

fn not_found(err: io::Error) -> FilegateError {
    match err.kind() {
        io::ErrorKind::NotFound => FilegateError::NotFound("file".to_string()),
        _ => FilegateError::Io(err),
    }
}

fn build_error(err: axum::http::Error) -> FilegateError {
    FilegateError::Io(io::Error::other(err))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
