//! Subtraction data paths

use std::path::{Path, PathBuf};

/// The directory holding a subtraction's files.
///
/// The id is lowercased and spaces become underscores so the directory name
/// is shell-safe.
pub fn join_subtraction_path(data_path: &Path, subtraction_id: &str) -> PathBuf {
    data_path
        .join("subtractions")
        .join(subtraction_id.replace(' ', "_").to_lowercase())
}

/// The Bowtie2 index prefix path for a subtraction.
pub fn join_subtraction_index_path(data_path: &Path, subtraction_id: &str) -> PathBuf {
    join_subtraction_path(data_path, subtraction_id).join("reference")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_subtraction_path_normalizes_id() {
        assert_eq!(
            join_subtraction_path(Path::new("/data"), "Arabidopsis Thaliana"),
            PathBuf::from("/data/subtractions/arabidopsis_thaliana")
        );
    }

    #[test]
    fn test_join_subtraction_index_path() {
        assert_eq!(
            join_subtraction_index_path(Path::new("/data"), "foo"),
            PathBuf::from("/data/subtractions/foo/reference")
        );
    }
}
