use super::syntax::ParseError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),
    #[error("Failed to read file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to parse {path}: {source}")]
    Parse { path: PathBuf, source: ParseError },
    #[error("Failed to walk directory: {0}")]
    Walk(String),
}

impl AnalysisError {
    /// Whether a directory scan should record this error and move on.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            AnalysisError::Read { .. } | AnalysisError::Parse { .. } | AnalysisError::Walk(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_file_errors() {
        let read = AnalysisError::Read {
            path: PathBuf::from("dags/a.py"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let parse = AnalysisError::Parse {
            path: PathBuf::from("dags/b.py"),
            source: ParseError::Syntax { line: 3, column: 7 },
        };
        let walk = AnalysisError::Walk("permission denied".to_string());

        assert!(read.is_per_file());
        assert!(parse.is_per_file());
        assert!(walk.is_per_file());
        assert!(!AnalysisError::PathNotFound(PathBuf::from("dags")).is_per_file());
    }

    #[test]
    fn test_error_messages() {
        let parse = AnalysisError::Parse {
            path: PathBuf::from("dags/b.py"),
            source: ParseError::Syntax { line: 3, column: 7 },
        };
        assert_eq!(
            parse.to_string(),
            "Failed to parse dags/b.py: syntax error at line 3, column 7"
        );
        assert_eq!(
            AnalysisError::Walk("loop detected".to_string()).to_string(),
            "Failed to walk directory: loop detected"
        );
    }
}
