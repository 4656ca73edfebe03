//! Case-insensitive image lookup inside the dataset directory.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extensions tried for every image id, in priority order.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

/// Snapshot of the regular files in a directory, keyed by lower-cased name.
pub(crate) struct ImageDirectory {
    entries: HashMap<String, PathBuf>,
}

impl ImageDirectory {
    /// Lists `dir` once.
    ///
    /// When several names collide after lower-casing, the one that sorts
    /// first byte-wise wins so lookups are deterministic.
    pub(crate) fn scan(dir: &Path) -> io::Result<Self> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut entries = HashMap::with_capacity(paths.len());
        for path in paths {
            let Some(name) = path.file_name() else {
                continue;
            };
            let key = name.to_string_lossy().to_lowercase();
            entries.entry(key).or_insert(path);
        }
        Ok(Self { entries })
    }

    /// Finds the file for `image_id`, trying each supported extension.
    ///
    /// The id's own extension is ignored; only its stem is matched.
    pub(crate) fn find(&self, image_id: &str) -> Option<&Path> {
        let stem = strip_extension(image_id).to_lowercase();
        SUPPORTED_EXTENSIONS.iter().find_map(|ext| {
            self.entries
                .get(&format!("{stem}{ext}"))
                .map(PathBuf::as_path)
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Removes the final extension from `name`, if it has one.
///
/// Leading dots do not start an extension, and a dot before the last path
/// separator is not an extension either.
pub(crate) fn strip_extension(name: &str) -> &str {
    let base_start = name.rfind(['/', '\\']).map_or(0, |pos| pos + 1);
    let base = &name[base_start..];
    let leading_dots = base.len() - base.trim_start_matches('.').len();
    match base[leading_dots..].rfind('.') {
        Some(pos) => &name[..base_start + leading_dots + pos],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::{strip_extension, ImageDirectory};
    use std::fs;

    #[test]
    fn strips_only_the_final_extension() {
        assert_eq!(strip_extension("leaf_01.JPG"), "leaf_01");
        assert_eq!(strip_extension("leaf.01.png"), "leaf.01");
        assert_eq!(strip_extension("leaf"), "leaf");
        assert_eq!(strip_extension(".hidden"), ".hidden");
        assert_eq!(strip_extension("dir.v2/leaf"), "dir.v2/leaf");
    }

    #[test]
    fn finds_files_regardless_of_case_and_prefers_jpg() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Leaf_A.PNG"), b"png").unwrap();
        fs::write(dir.path().join("leaf_a.jpg"), b"jpg").unwrap();
        fs::write(dir.path().join("LEAF_B.Jpeg"), b"jpeg").unwrap();
        fs::create_dir(dir.path().join("leaf_c.png")).unwrap();

        let images = ImageDirectory::scan(dir.path()).unwrap();
        assert_eq!(images.len(), 3);
        assert_eq!(
            images.find("LEAF_A.tif").unwrap(),
            dir.path().join("leaf_a.jpg")
        );
        assert_eq!(
            images.find("leaf_b").unwrap(),
            dir.path().join("LEAF_B.Jpeg")
        );
        assert!(images.find("leaf_c").is_none());
    }
}
