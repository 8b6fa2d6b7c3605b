use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use crate::error::{FileSystemError, FileSystemResult};

/// Reads at most `limit` bytes from the start of `reader`.
///
/// Short inputs are not an error: the returned buffer simply holds fewer than `limit`
/// bytes when the stream ends early.
///
/// # Errors
///
/// Returns [`FileSystemError::Stream`] if the underlying reader fails.
pub fn read_prefix<R: Read>(reader: R, limit: usize) -> FileSystemResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(limit);
    reader
        .take(limit as u64)
        .read_to_end(&mut buf)
        .map_err(|err| {
            FileSystemError::Stream {
                action: "read",
                source: err,
            }
        })?;
    Ok(buf)
}

/// Opens the file at `path` and reads at most `limit` bytes from its start.
///
/// # Errors
///
/// * [`FileSystemError::File`] with action `open` if the file cannot be opened.
/// * [`FileSystemError::File`] with action `read` if reading fails.
///
/// # Example
///
/// ```no_run
/// use datasniff_utils::error::FileSystemResult;
/// use datasniff_utils::fs::read_file_prefix;
///
/// fn main() -> FileSystemResult<()> {
///     let header = read_file_prefix("/tmp/sample.prm", 22)?;
///     println!("{} bytes", header.len());
///     Ok(())
/// }
/// ```
pub fn read_file_prefix<P: AsRef<Path>>(path: P, limit: usize) -> FileSystemResult<Vec<u8>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| {
        FileSystemError::File {
            path: path.to_path_buf(),
            action: "open",
            source: err,
        }
    })?;

    read_prefix(BufReader::new(file), limit).map_err(|err| {
        match err {
            FileSystemError::Stream { source, .. } => {
                FileSystemError::File {
                    path: path.to_path_buf(),
                    action: "read",
                    source,
                }
            }
            other => other,
        }
    })
}
