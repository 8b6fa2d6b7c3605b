//! Helpers that turn `///` docs on config structs into TOML comments.

use std::any::type_name;

use documented::{Documented, DocumentedFields};
use toml_edit::{ArrayOfTables, Decor, Item, RawString, Table};
use tracing::debug;

use crate::error::{ConfigError, Result};

/// Appends `docs` to the comment block stored in `decor`, one `#` line per doc line.
pub fn push_doc_comment(decor: &mut Decor, docs: &str) {
    let mut prefix = decor
        .prefix()
        .and_then(RawString::as_str)
        .unwrap_or_default()
        .to_string();

    if !prefix.is_empty() && !prefix.ends_with("\n\n") && !prefix.trim().is_empty() {
        prefix.push_str("#\n");
    }

    for line in docs.lines() {
        if line.is_empty() {
            prefix.push_str("#\n");
        } else {
            prefix.push_str("# ");
            prefix.push_str(line);
            prefix.push('\n');
        }
    }

    decor.set_prefix(prefix);
}

/// Annotates every key of `table` with the matching field docs of `T`.
///
/// Nested tables also receive the type-level docs of `T` when `with_type_docs` is set.
pub fn annotate_table<T>(table: &mut Table, with_type_docs: bool) -> Result<()>
where
    T: Documented + DocumentedFields,
{
    if with_type_docs {
        push_doc_comment(table.decor_mut(), T::DOCS);
    }

    for (mut key, item) in table.iter_mut() {
        let name = key.get().to_string();
        let Ok(docs) = T::get_field_docs(&name) else {
            debug!("no field docs for `{}` on {}", name, type_name::<T>());
            continue;
        };

        match item {
            Item::None => return Err(ConfigError::UnexpectedTomlItem(name)),
            Item::Value(_) => push_doc_comment(key.leaf_decor_mut(), docs),
            Item::Table(sub_table) => push_doc_comment(sub_table.decor_mut(), docs),
            Item::ArrayOfTables(array) => {
                if let Some(first) = array.iter_mut().next() {
                    push_doc_comment(first.decor_mut(), docs);
                }
            }
        }
    }

    Ok(())
}

/// Annotates the first entry of an array of tables; every entry shares the schema of `T`.
pub fn annotate_first_table<T>(array: &mut ArrayOfTables) -> Result<()>
where
    T: Documented + DocumentedFields,
{
    if let Some(first) = array.iter_mut().next() {
        annotate_table::<T>(first, false)
            .map_err(|err| ConfigError::AnnotateFirstTable(err.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn prefix_of(decor: &Decor) -> String {
        decor
            .prefix()
            .and_then(|p| p.as_str())
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_push_doc_comment() {
        let mut decor = Decor::new("", "");
        push_doc_comment(&mut decor, "Extensions to skip\n\nDefault: []");

        assert_eq!(prefix_of(&decor), "# Extensions to skip\n#\n# Default: []\n");
    }

    #[test]
    fn test_push_doc_comment_appends() {
        let mut decor = Decor::new("# existing\n", "");
        push_doc_comment(&mut decor, "more");

        assert_eq!(prefix_of(&decor), "# existing\n#\n# more\n");
    }

    #[test]
    fn test_annotated_default_document() {
        let doc = Config::default_config().to_annotated_document().unwrap();
        let rendered = doc.to_string();

        assert!(rendered.contains("# Classify multiple files in parallel."));
        assert!(rendered.contains("parallel = true"));
    }
}
