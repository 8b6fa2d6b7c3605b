use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect the format of files from their leading bytes
    #[command(arg_required_else_help = true)]
    #[clap(name = "classify", visible_alias = "c", visible_alias = "sniff")]
    Classify {
        /// Files to classify
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        paths: Vec<PathBuf>,

        /// Assign this format explicitly instead of sniffing
        #[arg(required = false, long = "as", value_name = "EXT")]
        assign: Option<String>,
    },

    /// List registered formats in evaluation order
    #[clap(name = "formats", visible_alias = "ls")]
    Formats,

    /// Print the effective configuration
    Config,

    /// Generate a default configuration file
    #[clap(name = "defconfig")]
    DefConfig,
}
