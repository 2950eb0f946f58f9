//! Line-oriented shell over the expense tracker.

pub mod context;
pub mod output;
pub mod shell;

pub use context::{CliError, CliMode, CommandError, ShellContext};
pub use shell::{run_cli, SCRIPT_ENV};
