use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::ops::view::FilterMode;

#[derive(Parser)]
#[command(name = "timp", about = concat!("Text IMP v", env!("CARGO_PKG_VERSION"), " - export, edit and re-apply scene text"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: textimp.toml found from the working directory up)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Scene document to work on (overrides scene.path from config)
    #[arg(long, global = true)]
    pub scene: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export every text element of the scene to a record file
    Export(ExportArgs),
    /// Write record text back onto the scene
    Apply(ApplyArgs),
    /// List records, grouped by container
    List(ListArgs),
    /// Change the text of one record in a record file
    Edit(EditArgs),
    /// Remove records from a record file
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct ExportArgs {
    /// Record file to write
    pub out: String,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Record file to apply
    pub file: String,
    /// Report what would change without writing the scene
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Record file to list (default: scan the scene)
    pub file: Option<String>,
    /// Which records to show (default: view.filter from config)
    #[arg(long, value_enum)]
    pub filter: Option<FilterArg>,
    /// Case-insensitive text to look for in "name [index] = text"
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Record file to change
    pub file: String,
    /// Container name
    pub container: String,
    /// 1-based element index
    pub index: usize,
    /// New text
    pub text: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Record file to change
    pub file: String,
    /// Container name
    pub container: String,
    /// Only remove the record with this element index
    #[arg(long)]
    pub index: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FilterArg {
    All,
    ExcludeExpressions,
}

impl From<FilterArg> for FilterMode {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => FilterMode::ShowAll,
            FilterArg::ExcludeExpressions => FilterMode::ExcludeExpressionDriven,
        }
    }
}
