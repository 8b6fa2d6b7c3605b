use std::path::{Path, PathBuf};

use datasniff_core::{FormatRegistry, Resolution, SniffError};
use nu_ansi_term::Color::{Cyan, Green, Yellow};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, error};

use crate::{
    error::{CliError, CliResult},
    utils::Colored,
};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ClassifyEntry {
    pub path: PathBuf,
    pub extension: Option<String>,
    pub method: &'static str,
}

impl ClassifyEntry {
    fn new(path: &Path, resolution: &Resolution) -> Self {
        let method = match resolution {
            Resolution::Assigned(_) => "assigned",
            Resolution::Sniffed(_) => "sniffed",
            Resolution::Unmatched => "manual",
        };
        Self {
            path: path.to_path_buf(),
            extension: resolution.extension().map(String::from),
            method,
        }
    }
}

/// One result line; unmatched files are flagged for manual classification.
fn render_entry(entry: &ClassifyEntry) -> String {
    let path = entry.path.display();
    match &entry.extension {
        Some(ext) if entry.method == "assigned" => {
            format!("{path}: {} (assigned)", Colored(Cyan, ext))
        }
        Some(ext) => format!("{path}: {}", Colored(Green, ext)),
        None => format!("{path}: {}", Colored(Yellow, "<manual>")),
    }
}

/// Resolves every path, keeping input order.
pub fn resolve_all(
    registry: &FormatRegistry,
    paths: &[PathBuf],
    assign: Option<&str>,
    parallel: bool,
) -> Vec<(PathBuf, Result<Resolution, SniffError>)> {
    let resolve = |path: &PathBuf| (path.clone(), registry.resolve(path, assign));

    if parallel && paths.len() > 1 {
        debug!(files = paths.len(), "classifying in parallel");
        paths.par_iter().map(resolve).collect()
    } else {
        paths.iter().map(resolve).collect()
    }
}

pub fn classify_files(
    registry: &FormatRegistry,
    paths: &[PathBuf],
    assign: Option<&str>,
    parallel: bool,
    json: bool,
) -> CliResult<()> {
    if let Some(ext) = assign {
        // Reject unknown formats once rather than once per file.
        registry.assign(ext)?;
    }

    let results = resolve_all(registry, paths, assign, parallel);
    let total = results.len();
    let mut entries = Vec::with_capacity(total);
    let mut failed = 0;

    for (path, result) in results {
        match result {
            Ok(resolution) => entries.push(ClassifyEntry::new(&path, &resolution)),
            Err(err) => {
                failed += 1;
                error!("{err}");
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!("{}", render_entry(entry));
        }
    }

    if failed > 0 {
        return Err(CliError::ClassifyFailed { failed, total });
    }

    Ok(())
}
