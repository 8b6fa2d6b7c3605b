use datasniff_core::FormatRegistry;
use nu_ansi_term::Color::{Cyan, Green, Red};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{themes::BorderCorrection, Panel, Style},
};
use tracing::info;

use crate::{error::CliResult, utils::Colored};

#[derive(Debug, Serialize)]
struct FormatRow<'a> {
    extension: &'a str,
    description: &'a str,
    access: String,
    prefix_length: usize,
    sniffing: bool,
}

pub fn list_formats(registry: &FormatRegistry, json: bool) -> CliResult<()> {
    if json {
        let rows: Vec<_> = registry
            .iter()
            .map(|d| {
                FormatRow {
                    extension: d.extension(),
                    description: d.description(),
                    access: d.access().to_string(),
                    prefix_length: d.prefix_length(),
                    sniffing: d.is_sniffable(),
                }
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let mut builder = Builder::new();
    builder.push_record(["#", "Extension", "Description", "Access", "Prefix", "Sniffing"]);

    for (idx, descriptor) in registry.iter().enumerate() {
        let sniffing = if descriptor.is_sniffable() {
            format!("{}", Colored(Green, "on"))
        } else {
            format!("{}", Colored(Red, "manual only"))
        };
        builder.push_record([
            (idx + 1).to_string(),
            format!("{}", Colored(Cyan, descriptor.extension())),
            descriptor.description().to_string(),
            descriptor.access().to_string(),
            descriptor.prefix_length().to_string(),
            sniffing,
        ]);
    }

    let table = builder
        .build()
        .with(Panel::header("Registered Formats"))
        .with(Style::rounded())
        .with(BorderCorrection {})
        .to_string();

    println!("{table}");
    info!("Reads at most {} bytes per file", registry.read_budget());

    Ok(())
}
