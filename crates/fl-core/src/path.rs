// ABOUTME: Vault path helpers.
// ABOUTME: Joins and strips folder prefixes on `/`-separated vault paths.

/// Strip trailing slashes; the vault root (`""` or `"/"`) becomes `""`
pub fn normalize_folder(folder: &str) -> &str {
    folder.trim_end_matches('/')
}

pub fn is_root(folder: &str) -> bool {
    normalize_folder(folder).is_empty()
}

/// The part of `path` below `folder`, or `None` if `path` lies outside it.
///
/// Every path lies inside the vault root. The folder itself is not inside
/// the folder.
pub fn relative_to<'a>(path: &'a str, folder: &str) -> Option<&'a str> {
    let folder = normalize_folder(folder);
    if folder.is_empty() {
        return (!path.is_empty()).then_some(path);
    }
    path.strip_prefix(folder)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty())
}

pub fn is_inside(path: &str, folder: &str) -> bool {
    relative_to(path, folder).is_some()
}

/// Resolve a folder-relative path against `folder`
pub fn join(folder: &str, relative: &str) -> String {
    let folder = normalize_folder(folder);
    if folder.is_empty() {
        relative.to_string()
    } else {
        format!("{}/{}", folder, relative)
    }
}

/// Last path component
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
