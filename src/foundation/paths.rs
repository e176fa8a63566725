use crate::foundation::error::{RigError, RigResult};

/// Normalize a catalog-relative asset path.
///
/// Manifests write part paths as `./portrait_output/...`; the normalized form drops `.` segments,
/// uses `/` separators, and rejects absolute paths or parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> RigResult<String> {
    let s = source.trim().replace('\\', "/");
    if s.is_empty() {
        return Err(RigError::validation("asset path must be non-empty"));
    }
    if s.starts_with('/') || s.contains("://") {
        return Err(RigError::validation(format!(
            "asset path '{source}' must be catalog-relative"
        )));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(RigError::validation(format!(
                "asset path '{source}' must not contain '..'"
            )));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(RigError::validation(format!(
            "asset path '{source}' must contain a file name"
        )));
    }

    Ok(out.join("/"))
}

/// Join a catalog-relative path onto the site URL.
pub fn resolve_url(site_url: &str, rel_path: &str) -> String {
    let site = site_url.trim_end_matches('/');
    let rel = rel_path.trim_start_matches('/');
    format!("{site}/{rel}")
}
