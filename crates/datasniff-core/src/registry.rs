//! Ordered, immutable registry of format descriptors.
//!
//! Descriptors are evaluated in registration order and the first match wins,
//! so stricter signatures must be registered ahead of looser ones.

use std::{io::Read, path::Path};

use datasniff_utils::fs::{read_file_prefix, read_prefix};
use tracing::{debug, trace};

use crate::{
    descriptor::FormatDescriptor,
    error::{Result, SniffError},
};

/// Outcome of sniffing one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SniffResult {
    /// Extension of the first matching descriptor, `None` when manual
    /// classification is required.
    pub matched_extension: Option<String>,
    /// Bytes actually read from the input.
    pub bytes_read: usize,
}

impl SniffResult {
    pub fn is_match(&self) -> bool {
        self.matched_extension.is_some()
    }
}

/// How the format of an input was decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The caller named the format explicitly.
    Assigned(String),
    /// A descriptor's predicate matched.
    Sniffed(String),
    /// Nothing matched; the format must be assigned by hand.
    Unmatched,
}

impl Resolution {
    pub fn extension(&self) -> Option<&str> {
        match self {
            Resolution::Assigned(ext) | Resolution::Sniffed(ext) => Some(ext),
            Resolution::Unmatched => None,
        }
    }
}

/// Collects descriptors before freezing them into a [`FormatRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    descriptors: Vec<FormatDescriptor>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, extension: &str) -> Option<usize> {
        self.descriptors
            .iter()
            .position(|d| d.extension() == extension)
    }

    fn check_new(&self, descriptor: &FormatDescriptor) -> Result<()> {
        descriptor.validate()?;
        if self.position(descriptor.extension()).is_some() {
            return Err(SniffError::DuplicateFormat(
                descriptor.extension().to_string(),
            ));
        }
        Ok(())
    }

    /// Appends `descriptor` after every descriptor registered so far.
    pub fn register(&mut self, descriptor: FormatDescriptor) -> Result<&mut Self> {
        self.check_new(&descriptor)?;
        trace!(extension = descriptor.extension(), "registering format");
        self.descriptors.push(descriptor);
        Ok(self)
    }

    /// Inserts `descriptor` immediately ahead of the descriptor registered as `anchor`.
    pub fn register_before(
        &mut self,
        anchor: &str,
        descriptor: FormatDescriptor,
    ) -> Result<&mut Self> {
        self.check_new(&descriptor)?;
        let idx = self
            .position(anchor)
            .ok_or_else(|| SniffError::UnknownFormat(anchor.to_string()))?;
        trace!(
            extension = descriptor.extension(),
            anchor,
            "registering format before anchor"
        );
        self.descriptors.insert(idx, descriptor);
        Ok(self)
    }

    /// Keeps `extension` registered but excludes it from sniffing.
    pub fn disable(&mut self, extension: &str) -> Result<&mut Self> {
        let idx = self
            .position(extension)
            .ok_or_else(|| SniffError::UnknownFormat(extension.to_string()))?;
        debug!(extension, "sniffing disabled");
        self.descriptors[idx].disable();
        Ok(self)
    }

    pub fn build(self) -> FormatRegistry {
        let read_budget = self
            .descriptors
            .iter()
            .map(FormatDescriptor::byte_budget)
            .max()
            .unwrap_or(0);

        debug!(
            formats = self.descriptors.len(),
            read_budget, "format registry ready"
        );

        FormatRegistry {
            descriptors: self.descriptors,
            read_budget,
        }
    }
}

/// Immutable ordered list of descriptors; safe to share across threads.
#[derive(Debug)]
pub struct FormatRegistry {
    descriptors: Vec<FormatDescriptor>,
    read_budget: usize,
}

impl FormatRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Bytes read from each input: the largest budget of any sniffable descriptor.
    pub fn read_budget(&self) -> usize {
        self.read_budget
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptors in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &FormatDescriptor> {
        self.descriptors.iter()
    }

    pub fn get(&self, extension: &str) -> Option<&FormatDescriptor> {
        self.descriptors.iter().find(|d| d.extension() == extension)
    }

    /// Looks up a descriptor for explicit assignment, including sniffing-disabled ones.
    pub fn assign(&self, extension: &str) -> Result<&FormatDescriptor> {
        self.get(extension)
            .ok_or_else(|| SniffError::UnknownFormat(extension.to_string()))
    }

    /// Returns the first descriptor whose predicate accepts `head`.
    pub fn match_head(&self, head: &[u8]) -> Option<&FormatDescriptor> {
        self.descriptors.iter().find(|descriptor| {
            let matched = descriptor.matches(head);
            trace!(extension = descriptor.extension(), matched, "checked format");
            matched
        })
    }

    /// Classifies an in-memory buffer; only its first [`Self::read_budget`] bytes matter.
    pub fn classify_bytes(&self, data: &[u8]) -> SniffResult {
        let head = &data[..data.len().min(self.read_budget)];
        self.result_for(head)
    }

    /// Reads a bounded prefix from `reader` and classifies it.
    pub fn classify<R: Read>(&self, reader: R) -> Result<SniffResult> {
        let head = read_prefix(reader, self.read_budget)?;
        Ok(self.result_for(&head))
    }

    /// Opens `path`, reads a bounded prefix and classifies it.
    pub fn classify_path<P: AsRef<Path>>(&self, path: P) -> Result<SniffResult> {
        let path = path.as_ref();
        let head = read_file_prefix(path, self.read_budget)?;
        let result = self.result_for(&head);
        debug!(
            path = %path.display(),
            extension = result.matched_extension.as_deref().unwrap_or("<manual>"),
            "classified"
        );
        Ok(result)
    }

    /// Uses `explicit` when given, otherwise sniffs `path`.
    ///
    /// An explicit assignment does not touch the file.
    pub fn resolve<P: AsRef<Path>>(&self, path: P, explicit: Option<&str>) -> Result<Resolution> {
        if let Some(extension) = explicit {
            let descriptor = self.assign(extension)?;
            return Ok(Resolution::Assigned(descriptor.extension().to_string()));
        }

        Ok(match self.classify_path(path)?.matched_extension {
            Some(extension) => Resolution::Sniffed(extension),
            None => Resolution::Unmatched,
        })
    }

    fn result_for(&self, head: &[u8]) -> SniffResult {
        SniffResult {
            matched_extension: self.match_head(head).map(|d| d.extension().to_string()),
            bytes_read: head.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, io::Cursor};

    use tempfile::tempdir;

    use super::*;
    use crate::descriptor::{Access, TextEncoding};

    const TEXT: Access = Access::Text(TextEncoding::Utf8);

    fn contains(ext: &str, needle: &'static str, prefix_length: usize) -> FormatDescriptor {
        FormatDescriptor::new(ext, ext, TEXT, prefix_length, move |p| p.contains(needle))
    }

    #[test]
    fn test_first_registered_match_wins() {
        let mut builder = FormatRegistry::builder();
        builder
            .register(contains("strict", "Sample Run: 7", 40))
            .unwrap()
            .register(contains("loose", "Sample Run", 40))
            .unwrap();
        let registry = builder.build();

        let result = registry.classify_bytes(b"Sample Run: 7 at 300K");
        assert_eq!(result.matched_extension.as_deref(), Some("strict"));

        let mut builder = FormatRegistry::builder();
        builder
            .register(contains("loose", "Sample Run", 40))
            .unwrap()
            .register(contains("strict", "Sample Run: 7", 40))
            .unwrap();
        let registry = builder.build();

        let result = registry.classify_bytes(b"Sample Run: 7 at 300K");
        assert_eq!(result.matched_extension.as_deref(), Some("loose"));
    }

    #[test]
    fn test_register_before() {
        let mut builder = FormatRegistry::builder();
        builder
            .register(contains("loose", "Run", 40))
            .unwrap()
            .register_before("loose", contains("strict", "Run: 7", 40))
            .unwrap();
        let registry = builder.build();

        let order: Vec<_> = registry.iter().map(|d| d.extension()).collect();
        assert_eq!(order, ["strict", "loose"]);
        assert_eq!(
            registry.classify_bytes(b"Run: 7").matched_extension.as_deref(),
            Some("strict")
        );
    }

    #[test]
    fn test_register_before_unknown_anchor() {
        let mut builder = FormatRegistry::builder();
        let err = builder
            .register_before("missing", contains("strict", "Run", 40))
            .unwrap_err();
        assert!(matches!(err, SniffError::UnknownFormat(ext) if ext == "missing"));
    }

    #[test]
    fn test_duplicate_extension_rejected() {
        let mut builder = FormatRegistry::builder();
        builder.register(contains("gsa", "a", 4)).unwrap();
        let err = builder.register(contains("gsa", "b", 4)).unwrap_err();
        assert!(matches!(err, SniffError::DuplicateFormat(ext) if ext == "gsa"));
    }

    #[test]
    fn test_disable_keeps_assignment() {
        let mut builder = FormatRegistry::builder();
        builder
            .register(contains("gsa", "Sample", 40))
            .unwrap()
            .disable("gsa")
            .unwrap();
        let registry = builder.build();

        assert_eq!(registry.classify_bytes(b"Sample").matched_extension, None);
        assert_eq!(registry.assign("gsa").unwrap().extension(), "gsa");
        assert_eq!(registry.read_budget(), 0);
        assert!(matches!(
            registry.assign("nope"),
            Err(SniffError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_read_budget_is_bounded() {
        let mut builder = FormatRegistry::builder();
        builder
            .register(FormatDescriptor::new("magic", "", Access::Bytes, 8, |_| false))
            .unwrap()
            .register(contains("text", "x", 10))
            .unwrap();
        let registry = builder.build();
        assert_eq!(registry.read_budget(), 40);

        let data = vec![b'z'; 1000];
        let result = registry.classify(Cursor::new(data)).unwrap();
        assert_eq!(result.bytes_read, 40);
        assert!(!result.is_match());
    }

    #[test]
    fn test_empty_registry() {
        let registry = FormatRegistry::builder().build();
        assert!(registry.is_empty());
        let result = registry.classify(Cursor::new(b"anything".to_vec())).unwrap();
        assert_eq!(result.matched_extension, None);
        assert_eq!(result.bytes_read, 0);
    }

    #[test]
    fn test_resolve() {
        let dir = tempdir().unwrap();
        let matching = dir.path().join("run.txt");
        let other = dir.path().join("notes.txt");
        fs::write(&matching, "Sample Run").unwrap();
        fs::write(&other, "lab notes").unwrap();

        let mut builder = FormatRegistry::builder();
        builder.register(contains("gsa", "Sample Run", 40)).unwrap();
        let registry = builder.build();

        assert_eq!(
            registry.resolve(&matching, None).unwrap(),
            Resolution::Sniffed("gsa".into())
        );
        assert_eq!(
            registry.resolve(&other, None).unwrap(),
            Resolution::Unmatched
        );
        assert_eq!(
            registry.resolve(&other, Some("gsa")).unwrap(),
            Resolution::Assigned("gsa".into())
        );
        assert_eq!(Resolution::Unmatched.extension(), None);

        // explicit assignment never opens the file
        let missing = dir.path().join("missing");
        assert!(registry.resolve(&missing, Some("gsa")).is_ok());
        assert!(matches!(
            registry.resolve(&missing, None),
            Err(SniffError::Io(_))
        ));
        assert!(matches!(
            registry.resolve(&other, Some("xyz")),
            Err(SniffError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FormatRegistry>();
    }
}
