/// Scheme prefix of engine resource paths.
pub const RES_SCHEME: &str = "res://";

/// Simplify a virtual path.
///
/// - Replaces backslashes with forward slashes
/// - Keeps a leading `res://` scheme or `/` root
/// - Collapses redundant separators (`a///b` → `a/b`)
/// - Drops `.` segments
/// - Collapses `name/..` pairs; a `..` with nothing left to collapse is kept
///
/// A surviving `..` escapes whatever directory the path is later joined to.
/// Callers that need containment must check for it themselves.
pub fn simplify(path: &str) -> String {
    let replaced = path.replace('\\', "/");
    let (prefix, rest) = if let Some(rest) = replaced.strip_prefix(RES_SCHEME) {
        (RES_SCHEME, rest)
    } else if let Some(rest) = replaced.strip_prefix('/') {
        ("/", rest)
    } else {
        ("", replaced.as_str())
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else {
                    segments.push(segment);
                }
            }
            _ => segments.push(segment),
        }
    }

    format!("{prefix}{}", segments.join("/"))
}

/// Strip the virtual root from a simplified path.
///
/// A single leading `/` is removed; otherwise a leading `res://` is removed;
/// anything else is returned unchanged.
pub fn strip_virtual_root(path: &str) -> &str {
    if let Some(rest) = path.strip_prefix('/') {
        rest
    } else if let Some(rest) = path.strip_prefix(RES_SCHEME) {
        rest
    } else {
        path
    }
}
