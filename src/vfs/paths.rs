/*!
 * Path Utilities
 * Pure helpers shared by the sync and async reactive filesystems
 *
 * Paths are slash-delimited strings. Internally they carry no leading or
 * trailing slash and no empty segments; the root is the empty string.
 * `.` and `..` are NOT resolved here: two paths are the same cache key iff
 * their normalized strings are equal.
 */

use super::types::{VfsError, VfsResult};

/// Cache key of the root directory
pub const ROOT: &str = "";

/// Normalize a path into its cache-key form
///
/// `"/"`, `""` and `"//"` all become the root; `"/a//b/"` becomes `"a/b"`.
pub fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(segment);
    }
    out
}

/// All segments but the last joined by `/`, or `/` when nothing is left
///
/// Feed the result through [`normalize`] to obtain the parent's cache key.
pub fn parent_dir(path: &str) -> String {
    let normalized = normalize(path);
    match normalized.rfind('/') {
        Some(idx) => normalized[..idx].to_string(),
        None => "/".to_string(),
    }
}

/// Last segment of a path (empty for the root)
pub fn base_name(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
}

/// Join a directory key and a child name into a child key
pub fn join(dir: &str, name: &str) -> String {
    let dir = normalize(dir);
    let name = normalize(name);
    match (dir.is_empty(), name.is_empty()) {
        (true, _) => name,
        (_, true) => dir,
        _ => format!("{}/{}", dir, name),
    }
}

/// Every prefix of `path` from the top-level segment down to `path` itself
///
/// `ancestors("a/b/c")` yields `["a", "a/b", "a/b/c"]`. The root is not included.
pub fn ancestors(path: &str) -> Vec<String> {
    let normalized = normalize(path);
    let mut prefixes = Vec::new();
    for (idx, ch) in normalized.char_indices() {
        if ch == '/' {
            prefixes.push(normalized[..idx].to_string());
        }
    }
    if !normalized.is_empty() {
        prefixes.push(normalized);
    }
    prefixes
}

/// True if `path` lies strictly below `ancestor` (both normalized)
pub fn is_descendant(ancestor: &str, path: &str) -> bool {
    if ancestor.is_empty() {
        return !path.is_empty();
    }
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == b'/'
}

/// Re-root `path` from `from` to `to` when it is `from` or a descendant of it
pub fn rebase(path: &str, from: &str, to: &str) -> Option<String> {
    if path == from {
        return Some(to.to_string());
    }
    if is_descendant(from, path) {
        let rest = if from.is_empty() { path } else { &path[from.len() + 1..] };
        return Some(join(to, rest));
    }
    None
}

/// Build a guard that confines paths to the subtree rooted at `base`
///
/// Every input is resolved relative to `base` (a leading `/` means the base
/// itself). `.` segments are dropped and `..` pops a segment:
/// - popping past the filesystem root is an error (`cannot go below root path`)
/// - ending up outside `base` but still above the root rewrites the result to `base`
///
/// The returned closure is cheap to clone and safe to share between threads.
pub fn limit_path(
    base: &str,
) -> impl Fn(&str) -> VfsResult<String> + Clone + Send + Sync + 'static {
    let absolute = base.starts_with('/');
    let mut base_segments: Vec<String> = Vec::new();
    for segment in base.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                base_segments.pop();
            }
            s => base_segments.push(s.to_string()),
        }
    }

    move |path: &str| {
        let mut resolved = base_segments.clone();
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if resolved.pop().is_none() {
                        return Err(VfsError::BelowRoot(path.to_string()));
                    }
                }
                s => resolved.push(s.to_string()),
            }
        }

        if !resolved.starts_with(&base_segments) {
            resolved.clone_from(&base_segments);
        }

        let joined = resolved.join("/");
        Ok(match (absolute, joined.is_empty()) {
            (true, _) => format!("/{}", joined),
            (false, true) => ".".to_string(),
            (false, false) => joined,
        })
    }
}
