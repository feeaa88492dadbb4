//! File management handlers.
//!
//! Thin orchestration over the filesystem: every client-supplied path
//! passes through the sandbox before any I/O, and streaming is delegated
//! to the stream module.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Multipart, Query, State},
    http::{header, HeaderMap},
    response::Response,
    Json,
};
use chrono::{DateTime, Utc};
use tokio_util::io::ReaderStream;
use tracing::{debug, error};

use crate::stream;
use crate::web::dto::{
    CopyRequest, CreateDirRequest, CreateDirResponse, DeleteRequest, DirEntryInfo, ListResponse,
    MoveRequest, NewPathResponse, OkResponse, PathQuery, RenameRequest, UploadError,
    UploadResponse, UploadedFile,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::FilegateError;

/// GET /api/files/list - list a directory.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PathQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let raw = query.path.as_deref().unwrap_or("/");
    let display = state.sandbox.virtual_path(raw)?;
    let dir = state.sandbox.resolve(raw)?;

    let mut entries = Vec::new();
    let mut read_dir = tokio::fs::read_dir(&dir).await.map_err(fs_err)?;
    while let Some(entry) = read_dir.next_entry().await.map_err(fs_err)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        // An entry disappearing between readdir and stat is skipped, not
        // an error for the whole listing.
        let Ok(metadata) = entry.metadata().await else {
            debug!(name = %name, "skipping unstattable entry");
            continue;
        };

        let modified = metadata
            .modified()
            .ok()
            .map(|t| DateTime::<Utc>::from(t).to_rfc3339());

        entries.push(DirEntryInfo {
            path: join_virtual(&display, &name),
            is_directory: metadata.is_dir(),
            is_file: metadata.is_file(),
            size: metadata.len(),
            modified,
            name,
        });
    }

    // Directories first, then files, each group sorted by name.
    entries.sort_by(|a, b| {
        b.is_directory
            .cmp(&a.is_directory)
            .then_with(|| a.name.cmp(&b.name))
    });

    Ok(Json(ListResponse {
        path: display,
        entries,
    }))
}

/// GET /api/files/download - whole-file transfer as an attachment.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PathQuery>,
) -> Result<Response, ApiError> {
    let raw = require_path(&query)?;
    let path = state.sandbox.resolve(raw)?;

    let metadata = tokio::fs::metadata(&path).await.map_err(fs_err)?;
    if metadata.is_dir() {
        return Err(ApiError::bad_request("Cannot download a directory"));
    }

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "download".to_string());

    let file = tokio::fs::File::open(&path).await.map_err(fs_err)?;
    let body = Body::from_stream(ReaderStream::new(file));

    Response::builder()
        .header(header::CONTENT_TYPE, stream::content_type_for(&path))
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&filename),
        )
        .header(header::CONTENT_LENGTH, metadata.len())
        .body(body)
        .map_err(|e| {
            error!("failed to build download response: {e}");
            ApiError::internal("Failed to build response")
        })
}

/// GET /api/files/stream - media delivery with HTTP range support.
pub async fn stream_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PathQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let raw = require_path(&query)?;
    let path = state.sandbox.resolve(raw)?;

    let range = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok());

    match stream::serve(&path, range).await {
        Ok(response) => Ok(response),
        Err(FilegateError::RangeNotSatisfiable { size }) => {
            Ok(stream::not_satisfiable_response(size))
        }
        Err(err) => Err(err.into()),
    }
}

/// POST /api/files/upload - multipart upload of one or more files.
///
/// Fields: `path` for the target directory, plus any number of `file*`
/// fields. Individual file failures are collected rather than aborting
/// the batch.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut target = "/".to_string();
    let mut pending: Vec<(Option<String>, bytes::Bytes)> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("failed to read multipart field: {e}");
        ApiError::bad_request("Invalid multipart data")
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "path" {
            target = field
                .text()
                .await
                .map_err(|_| ApiError::bad_request("Invalid path field"))?;
        } else if name.starts_with("file") {
            let filename = field.file_name().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|_| ApiError::bad_request("Failed to read file"))?;
            pending.push((filename, data));
        }
    }

    let display = state.sandbox.virtual_path(&target)?;
    let dir = state.sandbox.resolve(&target)?;
    tokio::fs::create_dir_all(&dir).await.map_err(fs_err)?;

    let mut uploaded_files = Vec::new();
    let mut errors = Vec::new();

    for (filename, data) in pending {
        let Some(filename) = filename else {
            errors.push(UploadError {
                file: String::new(),
                error: "Missing filename".to_string(),
            });
            continue;
        };

        if !is_valid_name(&filename) {
            errors.push(UploadError {
                file: filename,
                error: "Invalid filename".to_string(),
            });
            continue;
        }

        if data.len() as u64 > state.max_upload_size {
            let max_mb = state.max_upload_size / 1024 / 1024;
            errors.push(UploadError {
                file: filename,
                error: format!("File too large (max {max_mb}MB)"),
            });
            continue;
        }

        match tokio::fs::write(dir.join(&filename), &data).await {
            Ok(()) => uploaded_files.push(UploadedFile {
                path: join_virtual(&display, &filename),
                size: data.len() as u64,
                name: filename,
            }),
            Err(e) => errors.push(UploadError {
                file: filename,
                error: e.to_string(),
            }),
        }
    }

    Ok(Json(UploadResponse {
        success: true,
        uploaded_files,
        errors,
    }))
}

/// POST /api/files/rename - rename an entry within its directory.
pub async fn rename(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<NewPathResponse>, ApiError> {
    if !is_valid_name(&req.new_name) {
        return Err(ApiError::bad_request("Invalid path or name"));
    }

    let display = state.sandbox.virtual_path(&req.old_path)?;
    let old = state.sandbox.resolve(&req.old_path)?;
    if old == state.sandbox.root() {
        return Err(ApiError::bad_request("Cannot rename the root directory"));
    }

    // The parent exists because `old` is a strict descendant of the root.
    let new = old
        .parent()
        .map(|dir| dir.join(&req.new_name))
        .ok_or_else(|| ApiError::bad_request("Invalid path or name"))?;

    tokio::fs::rename(&old, &new).await.map_err(fs_err)?;

    Ok(Json(NewPathResponse::new(join_virtual(
        &virtual_parent(&display),
        &req.new_name,
    ))))
}

/// POST /api/files/move - relocate an entry under the root.
pub async fn move_entry(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<NewPathResponse>, ApiError> {
    let source = state.sandbox.resolve(&req.source_path)?;
    let target = state.sandbox.resolve(&req.target_path)?;
    let display = state.sandbox.virtual_path(&req.target_path)?;

    if source == state.sandbox.root() {
        return Err(ApiError::bad_request("Cannot move the root directory"));
    }
    if tokio::fs::try_exists(&target).await.map_err(fs_err)? {
        return Err(ApiError::conflict("Target already exists"));
    }

    tokio::fs::rename(&source, &target).await.map_err(fs_err)?;

    Ok(Json(NewPathResponse::new(display)))
}

/// POST /api/files/copy - recursive copy without overwrite.
pub async fn copy_entry(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CopyRequest>,
) -> Result<Json<NewPathResponse>, ApiError> {
    let source = state.sandbox.resolve(&req.source_path)?;
    let target = state.sandbox.resolve(&req.target_path)?;
    let display = state.sandbox.virtual_path(&req.target_path)?;

    if tokio::fs::try_exists(&target).await.map_err(fs_err)? {
        return Err(ApiError::conflict("Target already exists"));
    }
    if target.starts_with(&source) {
        return Err(ApiError::bad_request(
            "Cannot copy a directory into itself",
        ));
    }

    copy_recursive(&source, &target).await.map_err(fs_err)?;

    Ok(Json(NewPathResponse::new(display)))
}

/// DELETE /api/files/delete - remove a file or directory tree.
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let path = state.sandbox.resolve(&req.path)?;
    if path == state.sandbox.root() {
        return Err(ApiError::bad_request("Cannot delete the root directory"));
    }

    let metadata = tokio::fs::metadata(&path).await.map_err(fs_err)?;
    if metadata.is_dir() {
        tokio::fs::remove_dir_all(&path).await.map_err(fs_err)?;
    } else {
        tokio::fs::remove_file(&path).await.map_err(fs_err)?;
    }

    Ok(Json(OkResponse::new()))
}

/// POST /api/files/create-dir - create a directory.
pub async fn create_dir(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateDirRequest>,
) -> Result<Json<CreateDirResponse>, ApiError> {
    if !is_valid_name(&req.name) {
        return Err(ApiError::bad_request("Invalid path or name"));
    }

    let display = state.sandbox.virtual_path(&req.path)?;
    let parent = state.sandbox.resolve(&req.path)?;

    tokio::fs::create_dir_all(parent.join(&req.name))
        .await
        .map_err(fs_err)?;

    Ok(Json(CreateDirResponse {
        success: true,
        path: join_virtual(&display, &req.name),
    }))
}

/// Extract the required `path` query parameter.
fn require_path(query: &PathQuery) -> Result<&str, ApiError> {
    query
        .path
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("Path is required"))
}

/// Map filesystem errors to API errors, keeping NotFound distinct.
fn fs_err(err: io::Error) -> ApiError {
    match err.kind() {
        io::ErrorKind::NotFound => ApiError::not_found("No such file or directory"),
        _ => {
            error!("filesystem error: {err}");
            ApiError::internal(err.to_string())
        }
    }
}

/// Whether `name` is usable as a single new path segment.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

/// Append a name to a client-visible directory path.
fn join_virtual(dir: &str, name: &str) -> String {
    if dir == "/" {
        format!("/{name}")
    } else {
        format!("{dir}/{name}")
    }
}

/// Client-visible parent of a client-visible path.
fn virtual_parent(path: &str) -> String {
    match path.rsplit_once('/') {
        Some(("", _)) | None => "/".to_string(),
        Some((parent, _)) => parent.to_string(),
    }
}

/// Copy a file or directory tree without following an async recursion.
async fn copy_recursive(source: &Path, target: &Path) -> io::Result<()> {
    let mut work: Vec<(PathBuf, PathBuf)> = vec![(source.to_path_buf(), target.to_path_buf())];

    while let Some((from, to)) = work.pop() {
        let metadata = tokio::fs::metadata(&from).await?;
        if metadata.is_dir() {
            tokio::fs::create_dir_all(&to).await?;
            let mut read_dir = tokio::fs::read_dir(&from).await?;
            while let Some(entry) = read_dir.next_entry().await? {
                work.push((entry.path(), to.join(entry.file_name())));
            }
        } else {
            tokio::fs::copy(&from, &to).await?;
        }
    }

    Ok(())
}

/// Content-Disposition value for attachment downloads.
///
/// Strips control characters to keep header injection out, and adds an
/// RFC 5987 `filename*` parameter for non-ASCII names.
fn content_disposition_header(filename: &str) -> String {
    let has_special = filename
        .chars()
        .any(|c| c.is_control() || c == '"' || c == '\\');

    if filename.is_ascii() && !has_special {
        return format!("attachment; filename=\"{filename}\"");
    }

    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();

    let encoded = urlencoding::encode(filename);
    format!("attachment; filename=\"{sanitized}\"; filename*=UTF-8''{encoded}")
}
