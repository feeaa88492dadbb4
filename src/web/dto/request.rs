//! Request DTOs for the Web API.

use serde::Deserialize;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username.
    #[serde(default)]
    pub username: String,
    /// Password.
    #[serde(default)]
    pub password: String,
}

/// Query string carrying a client path.
#[derive(Debug, Deserialize)]
pub struct PathQuery {
    /// Path relative to the served root.
    pub path: Option<String>,
}

/// Rename request: change an entry's name within its directory.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    /// Current path of the entry.
    pub old_path: String,
    /// New name, a single path segment.
    pub new_name: String,
}

/// Move request: relocate an entry to another path under the root.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    /// Current path of the entry.
    pub source_path: String,
    /// Destination path, including the entry's name.
    pub target_path: String,
}

/// Copy request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyRequest {
    /// Path of the entry to copy.
    pub source_path: String,
    /// Destination path, including the new entry's name.
    pub target_path: String,
}

/// Delete request.
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    /// Path of the entry to delete.
    pub path: String,
}

/// Directory creation request.
#[derive(Debug, Deserialize)]
pub struct CreateDirRequest {
    /// Parent directory path.
    pub path: String,
    /// Name of the directory to create, a single path segment.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_defaults_missing_fields() {
        let req: LoginRequest = serde_json::from_str("{}").unwrap();
        assert!(req.username.is_empty());
        assert!(req.password.is_empty());
    }

    #[test]
    fn test_rename_request_wire_names() {
        let req: RenameRequest =
            serde_json::from_str(r#"{"oldPath": "/a/b.txt", "newName": "c.txt"}"#).unwrap();
        assert_eq!(req.old_path, "/a/b.txt");
        assert_eq!(req.new_name, "c.txt");
    }

    #[test]
    fn test_copy_request_wire_names() {
        let req: CopyRequest =
            serde_json::from_str(r#"{"sourcePath": "/a", "targetPath": "/b"}"#).unwrap();
        assert_eq!(req.source_path, "/a");
        assert_eq!(req.target_path, "/b");
    }
}
