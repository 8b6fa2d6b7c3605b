use clap::Parser;
use classify::classify_files;
use cli::{Args, Commands};
use datasniff_config::config::{env_config_path, generate_default_config, set_config_path, Config};
use datasniff_core::FormatRegistry;
use datasniff_utils::path::resolve_path;
use error::CliResult;
use formats::list_formats;
use logging::setup_logging;
use tracing::debug;

mod classify;
mod cli;
mod error;
mod formats;
mod logging;
mod utils;

fn handle_cli() -> CliResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color || args.json {
        utils::set_color(false);
    }

    run(args)
}

fn run(args: Args) -> CliResult<()> {
    let path = match args.config {
        Some(ref c) => resolve_path(c)?,
        None => env_config_path()?,
    };
    debug!("using config file {}", path.display());
    set_config_path(path);

    match args.command {
        Commands::Classify { paths, assign } => {
            let config = Config::new()?;
            let registry = FormatRegistry::from_config(&config)?;
            classify_files(
                &registry,
                &paths,
                assign.as_deref(),
                config.parallel(),
                args.json,
            )?;
        }
        Commands::Formats => {
            let registry = FormatRegistry::from_config(&Config::new()?)?;
            list_formats(&registry, args.json)?;
        }
        Commands::Config => {
            println!("{}", toml::to_string_pretty(&Config::new()?)?);
        }
        Commands::DefConfig => {
            generate_default_config()?;
        }
    }

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
