//! Response DTOs for the Web API.

use serde::Serialize;

/// Acknowledgement reply for mutating operations.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    /// Always true; errors reply with an error body instead.
    pub success: bool,
}

impl OkResponse {
    /// The canonical success reply.
    pub fn new() -> Self {
        Self { success: true }
    }
}

impl Default for OkResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Authentication status reply.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Whether the server requires login at all.
    pub auth_enabled: bool,
    /// Whether this request carries a valid session.
    pub authenticated: bool,
}

/// Directory listing reply.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    /// Normalized path that was listed.
    pub path: String,
    /// Entries, directories first, each group name-sorted.
    pub entries: Vec<DirEntryInfo>,
}

/// One entry in a directory listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirEntryInfo {
    /// Entry name.
    pub name: String,
    /// Whether the entry is a directory.
    pub is_directory: bool,
    /// Whether the entry is a regular file.
    pub is_file: bool,
    /// Size in bytes (0 for directories on some platforms).
    pub size: u64,
    /// Last modification time, RFC 3339, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    /// Client path of the entry.
    pub path: String,
}

/// Upload reply.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// True even when individual files failed; see `errors`.
    pub success: bool,
    /// Files written successfully.
    pub uploaded_files: Vec<UploadedFile>,
    /// Per-file failures.
    pub errors: Vec<UploadError>,
}

/// A successfully uploaded file.
#[derive(Debug, Serialize)]
pub struct UploadedFile {
    /// Original filename.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Client path the file was written to.
    pub path: String,
}

/// A failed upload within a batch.
#[derive(Debug, Serialize)]
pub struct UploadError {
    /// Filename the failure applies to.
    pub file: String,
    /// Failure description.
    pub error: String,
}

/// Reply for operations that produce a new path (rename, move, copy).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPathResponse {
    /// Operation outcome.
    pub success: bool,
    /// Client path of the resulting entry.
    pub new_path: String,
}

impl NewPathResponse {
    /// Success reply pointing at `new_path`.
    pub fn new(new_path: impl Into<String>) -> Self {
        Self {
            success: true,
            new_path: new_path.into(),
        }
    }
}

/// Directory creation reply.
#[derive(Debug, Serialize)]
pub struct CreateDirResponse {
    /// Operation outcome.
    pub success: bool,
    /// Client path of the created directory.
    pub path: String,
}
