use std::{error::Error, fmt, path::PathBuf};

#[derive(Debug)]
pub enum PathError {
    CurrentDir { source: std::io::Error },

    Empty,

    MissingEnvVar { var: String, input: String },

    UnclosedVariable { input: String },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::Empty => write!(f, "Path is empty"),
            PathError::CurrentDir { source } => {
                write!(f, "Failed to get current directory: {source}")
            }
            PathError::UnclosedVariable { input } => {
                write!(f, "Unclosed variable expression starting at `{input}`")
            }
            PathError::MissingEnvVar { var, input } => {
                write!(f, "Environment variable `{var}` not set in `{input}`")
            }
        }
    }
}

impl Error for PathError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PathError::CurrentDir { source } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum FileSystemError {
    File {
        path: PathBuf,
        action: &'static str,
        source: std::io::Error,
    },

    Stream {
        action: &'static str,
        source: std::io::Error,
    },
}

impl FileSystemError {
    /// Returns the underlying I/O error kind.
    pub fn kind(&self) -> std::io::ErrorKind {
        match self {
            FileSystemError::File { source, .. } | FileSystemError::Stream { source, .. } => {
                source.kind()
            }
        }
    }
}

impl fmt::Display for FileSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSystemError::File {
                path,
                action,
                source,
            } => {
                write!(f, "Failed to {action} file `{}`: {source}", path.display())
            }
            FileSystemError::Stream { action, source } => {
                write!(f, "Failed to {action} stream: {source}")
            }
        }
    }
}

impl Error for FileSystemError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FileSystemError::File { source, .. } => Some(source),
            FileSystemError::Stream { source, .. } => Some(source),
        }
    }
}

pub type FileSystemResult<T> = std::result::Result<T, FileSystemError>;
pub type PathResult<T> = std::result::Result<T, PathError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_path_error_display_and_source() {
        let io_error = io::Error::other("some error");
        let current_dir_error = PathError::CurrentDir { source: io_error };
        assert_eq!(
            current_dir_error.to_string(),
            "Failed to get current directory: some error"
        );
        assert!(current_dir_error.source().is_some());

        let missing_env_var_error = PathError::MissingEnvVar {
            var: "VAR".to_string(),
            input: "$VAR".to_string(),
        };
        assert_eq!(
            missing_env_var_error.to_string(),
            "Environment variable `VAR` not set in `$VAR`"
        );
        assert!(missing_env_var_error.source().is_none());
    }

    #[test]
    fn test_file_system_error_display_and_kind() {
        let file_error = FileSystemError::File {
            path: PathBuf::from("/data/run.gsa"),
            action: "open",
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(
            file_error.to_string(),
            "Failed to open file `/data/run.gsa`: not found"
        );
        assert_eq!(file_error.kind(), io::ErrorKind::NotFound);
        assert!(file_error.source().is_some());

        let stream_error = FileSystemError::Stream {
            action: "read",
            source: io::Error::new(io::ErrorKind::UnexpectedEof, "eof"),
        };
        assert_eq!(stream_error.to_string(), "Failed to read stream: eof");
    }
}
