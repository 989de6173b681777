use rand::Rng;
use rand::distr::Alphanumeric;

use super::error::StorageError;

/// Length of the random suffix added when a name is already taken.
const SUFFIX_LEN: usize = 7;

/// Returns the last component of a `/` or `\` separated path.
pub fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Turn a client-supplied file name into a name that is safe to store and to
/// put in a URL.
///
/// Directory components are dropped, whitespace becomes `_`, and anything other
/// than alphanumerics, `-`, `_` and `.` is removed.
pub fn valid_name(file_name: &str) -> Result<String, StorageError> {
    let cleaned: String = base_name(file_name)
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        return Err(StorageError::InvalidName(format!(
            "could not derive a valid name from '{file_name}'"
        )));
    }

    Ok(cleaned)
}

/// Insert `_{suffix}` before the extension: `manual.tar.gz` -> `manual.tar_x1Y2z3Q.gz`.
pub(crate) fn with_suffix(name: &str, suffix: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{suffix}.{ext}"),
        _ => format!("{name}_{suffix}"),
    }
}

pub(crate) fn random_suffix() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(char::from)
        .collect()
}

/// Validate a stored relative path (no absolute paths, no traversal).
pub(crate) fn validate_relative_path(path: &str) -> Result<(), StorageError> {
    let invalid = |reason: &str| Err(StorageError::InvalidName(format!("{reason}: '{path}'")));

    if path.is_empty() {
        return invalid("empty path");
    }
    if path.contains('\0') {
        return invalid("null byte in path");
    }
    if path.contains('\\') {
        return invalid("backslash in path");
    }
    if path.starts_with('/') {
        return invalid("absolute path");
    }
    if path.split('/').any(|segment| segment.is_empty() || segment == "..") {
        return invalid("path traversal or empty segment");
    }
    Ok(())
}
