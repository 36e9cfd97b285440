use super::FileSystem;
use std::fs;
use std::io;
use std::path::Path;

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_real_fs_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dag.py");
        fs::write(&path, "dag = DAG('x')\n").unwrap();

        let real = RealFileSystem::new();
        assert!(real.exists(&path));
        assert!(real.is_file(&path));
        assert!(real.is_dir(dir.path()));
        assert_eq!(real.read_to_string(&path).unwrap(), "dag = DAG('x')\n");
    }

    #[test]
    fn test_real_fs_rejects_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.py");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();

        let err = RealFileSystem::new().read_to_string(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_real_fs_missing_file() {
        let err = RealFileSystem::new()
            .read_to_string(Path::new("/nonexistent/dag.py"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
