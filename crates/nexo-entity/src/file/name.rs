//! File-name helpers for renames and storage keys.

/// Split a file name into base name and extension.
///
/// The extension is whatever follows the last `.`. Names with no dot, a
/// leading dot only (`.env`) or a trailing dot have no extension.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

/// Build the new name of a file renamed to `new_base`, keeping the
/// extension of `current`.
///
/// Returns `None` when `new_base` is blank. A `new_base` that already ends
/// with the current extension, in any case, is not suffixed twice; the
/// extension keeps its original spelling.
pub fn rename_preserving_extension(current: &str, new_base: &str) -> Option<String> {
    let new_base = new_base.trim();
    if new_base.is_empty() {
        return None;
    }

    match split_extension(current).1 {
        Some(ext) => {
            let suffix = format!(".{ext}");
            let cut = new_base.len().saturating_sub(suffix.len());
            let base = match new_base.get(cut..) {
                Some(tail) if cut > 0 && tail.eq_ignore_ascii_case(&suffix) => &new_base[..cut],
                _ => new_base,
            };
            Some(format!("{base}{suffix}"))
        }
        None => Some(new_base.to_string()),
    }
}
