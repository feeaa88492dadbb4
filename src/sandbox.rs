//! Path sandboxing for client-supplied paths.
//!
//! Every file operation receives its target path from the client and must
//! stay inside a single root directory fixed at startup. `PathSandbox`
//! normalizes the untrusted input lexically, rejects traversal attempts,
//! and joins the result onto the root with a final containment check.
//!
//! Resolution is purely lexical; symlink targets are not canonicalized
//! (see DESIGN.md).

use std::path::{Path, PathBuf};

use crate::{FilegateError, Result};

/// Sandbox around a fixed root directory.
///
/// The root is created if missing and canonicalized once at construction.
/// It never changes for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct PathSandbox {
    root: PathBuf,
}

impl PathSandbox {
    /// Create a sandbox rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        let root = root.canonicalize()?;
        Ok(Self { root })
    }

    /// The canonical root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an untrusted relative path against the root.
    ///
    /// Empty or `/`-only input resolves to the root itself. Any `..`
    /// segment surviving lexical normalization, or a percent-encoding
    /// that would alter the path structure, is rejected before any
    /// filesystem access. Pure function of (root, input).
    pub fn resolve(&self, untrusted: &str) -> Result<PathBuf> {
        let segments = normalize(untrusted)?;

        let mut resolved = self.root.clone();
        for segment in &segments {
            resolved.push(segment);
        }

        // Containment is a component-wise prefix check on the final
        // absolute form, not a substring match.
        if !resolved.starts_with(&self.root) {
            return Err(invalid(untrusted));
        }

        Ok(resolved)
    }

    /// Normalized client-visible form of an untrusted path.
    ///
    /// Returns `/`-rooted display paths such as `/movies/2024`, with the
    /// same rejection rules as [`resolve`](Self::resolve).
    pub fn virtual_path(&self, untrusted: &str) -> Result<String> {
        let segments = normalize(untrusted)?;
        if segments.is_empty() {
            Ok("/".to_string())
        } else {
            Ok(format!("/{}", segments.join("/")))
        }
    }
}

/// Lexically normalize an untrusted path into its component segments.
///
/// Collapses empty and `.` segments, cancels `a/..` pairs, and rejects
/// any `..` that would climb above the start of the path.
fn normalize(untrusted: &str) -> Result<Vec<&str>> {
    let trimmed = untrusted.trim();

    if trimmed.contains('\0') {
        return Err(invalid(untrusted));
    }

    if trimmed.contains('%') {
        check_percent_encoding(trimmed)?;
    }

    let mut segments = Vec::new();
    for segment in trimmed.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                // A `..` with nothing left to cancel escapes the root.
                if segments.pop().is_none() {
                    return Err(invalid(untrusted));
                }
            }
            other => segments.push(other),
        }
    }

    Ok(segments)
}

/// Reject input whose percent-decoded form has a different path structure.
///
/// Catches encoded traversals such as `%2e%2e/secret` and encoded
/// separators such as `a%2Fb`, including the double-encoded variants that
/// survive the framework's own single decode pass.
fn check_percent_encoding(raw: &str) -> Result<()> {
    let decoded = urlencoding::decode(raw).map_err(|_| invalid(raw))?;
    if decoded == raw {
        return Ok(());
    }

    let separators = |s: &str| {
        s.bytes()
            .filter(|b| matches!(b, b'/' | b'\\'))
            .count()
    };

    if separators(&decoded) != separators(raw) {
        return Err(invalid(raw));
    }
    if decoded.contains("..") && !raw.contains("..") {
        return Err(invalid(raw));
    }

    Ok(())
}

fn invalid(path: &str) -> FilegateError {
    FilegateError::InvalidPath(path.to_string())
}
