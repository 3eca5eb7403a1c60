//! Structural rewrite of backend API documents
//!
//! Backends describe their operations relative to their own root. The proxy
//! strips a route prefix before forwarding, so the aggregated document has to
//! put that prefix back on every key of the `paths` map. Everything else in the
//! document is carried over untouched, including fields this gateway does not
//! understand.

use std::borrow::Cow;

use serde_json::{Map, Value};

/// Top-level field holding the path map
pub const PATHS_FIELD: &str = "paths";

#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("document root is not an object")]
    NotAnObject,

    #[error("document has no `paths` field")]
    MissingPaths,

    #[error("`paths` is not an object")]
    InvalidPaths,
}

/// Apply `prefix` to `path` unless it is empty or already present.
pub fn prefixed_path<'a>(path: &'a str, prefix: &str) -> Cow<'a, str> {
    if prefix.is_empty() || path.starts_with(prefix) {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("{}{}", prefix, path))
    }
}

/// Parse raw document text and rewrite its path map with `prefix`.
pub fn rewrite_document(raw: &str, prefix: &str) -> Result<Value, RewriteError> {
    let root: Value = serde_json::from_str(raw)?;
    rewrite_value(root, prefix)
}

/// Rewrite an already parsed document.
///
/// Keys that collide after rewriting keep the value of the later key in
/// document order.
pub fn rewrite_value(root: Value, prefix: &str) -> Result<Value, RewriteError> {
    let Value::Object(fields) = root else {
        return Err(RewriteError::NotAnObject);
    };

    let mut document = Map::with_capacity(fields.len());
    let mut has_paths = false;
    for (name, value) in fields {
        if name == PATHS_FIELD {
            let Value::Object(paths) = value else {
                return Err(RewriteError::InvalidPaths);
            };
            document.insert(name, Value::Object(rewrite_paths(paths, prefix)));
            has_paths = true;
        } else {
            document.insert(name, value);
        }
    }

    if !has_paths {
        return Err(RewriteError::MissingPaths);
    }
    Ok(Value::Object(document))
}

fn rewrite_paths(paths: Map<String, Value>, prefix: &str) -> Map<String, Value> {
    paths
        .into_iter()
        .map(|(path, item)| {
            let rewritten = match prefixed_path(&path, prefix) {
                Cow::Borrowed(_) => path,
                Cow::Owned(prefixed) => prefixed,
            };
            (rewritten, item)
        })
        .collect()
}
