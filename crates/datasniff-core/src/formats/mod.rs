//! Built-in format descriptors.

pub mod gsas2;

use crate::{
    error::Result,
    registry::{FormatRegistry, RegistryBuilder},
};

/// Registers every built-in descriptor, in evaluation order.
pub fn register_builtin(builder: &mut RegistryBuilder) -> Result<()> {
    for descriptor in gsas2::descriptors() {
        builder.register(descriptor)?;
    }
    Ok(())
}

impl FormatRegistry {
    /// Registry holding only the built-in formats.
    pub fn builtin() -> Result<Self> {
        let mut builder = FormatRegistry::builder();
        register_builtin(&mut builder)?;
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, io::Cursor, path::PathBuf};

    use rayon::prelude::*;
    use tempfile::{tempdir, TempDir};

    use super::*;
    use crate::error::SniffError;

    fn write(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn classify(content: &str) -> Option<String> {
        FormatRegistry::builtin()
            .unwrap()
            .classify(Cursor::new(content.as_bytes().to_vec()))
            .unwrap()
            .matched_extension
    }

    #[test]
    fn test_prm_header() {
        let content = format!("{}\nINS   BANK      1\n", gsas2::PRM_HEADER);
        assert_eq!(classify(&content).as_deref(), Some("prm"));
    }

    #[test]
    fn test_instprm_header() {
        let content = "#GSAS-II instrument parameter file; do not add/delete items!\nType:PXC\n";
        assert_eq!(classify(content).as_deref(), Some("instprm"));
    }

    #[test]
    fn test_gsa_needs_both_phrases() {
        assert_eq!(
            classify("Sample Run: 42 Wavelength: 1.54\nBANK 1").as_deref(),
            Some("gsa")
        );
        assert_eq!(classify("Sample Run: 42\nBANK 1"), None);
        assert_eq!(classify("Wavelength: 1.54\nBANK 1"), None);
    }

    #[test]
    fn test_unrelated_and_empty_content() {
        assert_eq!(classify("chr1\t100\t200\tpeak\n"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_disabled_formats_are_never_sniffed() {
        let registry = FormatRegistry::builtin().unwrap();
        let pickled = b"\x80\x02]q\x00(]q\x01(X\x08\x00\x00\x00Controls";
        let samples: [&[u8]; 4] = [
            pickled,
            b"            1234567890",
            b"Sample Run: 1 Wavelength: 1",
            b"",
        ];

        for sample in samples {
            let result = registry.classify_bytes(sample);
            assert_ne!(result.matched_extension.as_deref(), Some("gpx"));
            assert_ne!(result.matched_extension.as_deref(), Some("raw"));
        }
        assert!(registry.assign("gpx").is_ok());
        assert!(registry.assign("raw").is_ok());
    }

    #[test]
    fn test_read_budget() {
        // gsa: 70 UTF-8 characters
        assert_eq!(FormatRegistry::builtin().unwrap().read_budget(), 280);
    }

    #[test]
    fn test_classify_paths() {
        let dir = tempdir().unwrap();
        let files = [
            (write(&dir, "a.prm", b"            1234567890\n"), Some("prm")),
            (
                write(&dir, "b.instprm", b"#GSAS-II instrument parameter file\n"),
                Some("instprm"),
            ),
            (
                write(&dir, "c.gsa", b"Sample Run: 9 Wavelength: 0.7\n"),
                Some("gsa"),
            ),
            (write(&dir, "d.txt", b"hello"), None),
        ];

        let registry = FormatRegistry::builtin().unwrap();
        let results: Vec<_> = files
            .par_iter()
            .map(|(path, _)| registry.classify_path(path).unwrap().matched_extension)
            .collect();

        for ((_, expected), actual) in files.iter().zip(results) {
            assert_eq!(actual.as_deref(), *expected);
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let registry = FormatRegistry::builtin().unwrap();
        assert!(matches!(
            registry.classify_path(dir.path().join("missing.gsa")),
            Err(SniffError::Io(_))
        ));
    }
}
