use std::path::{Component, Path, PathBuf};

use serde::Serializer;

/// Makes `path` absolute against the current directory and folds `.` and
/// `..` components lexically. Symlinks are left unresolved, so a path spelled
/// differently in a cache file maps to the same key as the walked path.
pub fn absolute_path(path: &Path) -> PathBuf {
    let joined = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Renders paths as a bracketed, single-quoted list: `['a', 'b']`.
pub fn format_path_list<'a, I>(paths: I) -> String
where
    I: IntoIterator<Item = &'a PathBuf>,
{
    let quoted: Vec<String> = paths
        .into_iter()
        .map(|p| format!("'{}'", p.display()))
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// Serializes a path as text, replacing bytes that aren't valid UTF-8.
pub fn serialize_path_lossy<S: Serializer>(
    path: &Path,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&path.to_string_lossy())
}

pub fn serialize_paths_lossy<S: Serializer>(
    paths: &[PathBuf],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(paths.iter().map(|p| p.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_path_folds_dot_components() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(absolute_path(Path::new("a/./b/../c")), cwd.join("a").join("c"));
        assert_eq!(absolute_path(Path::new("/x/y/../z")), PathBuf::from("/x/z"));
    }

    #[test]
    fn path_list_looks_like_a_quoted_list() {
        let paths = vec![PathBuf::from("/a/f1"), PathBuf::from("/b/f2")];
        assert_eq!(format_path_list(&paths), "['/a/f1', '/b/f2']");
    }
}
