//! Command-line interface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "codepad", about = "Highlight Python source and run it in a sandboxed interpreter", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print a file with syntax highlighting.
    Highlight(HighlightArgs),
    /// Run code in a child interpreter and show its output.
    Run(RunArgs),
}

#[derive(Args, Debug, Clone)]
pub struct HighlightArgs {
    /// File to highlight ("-" reads stdin).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Rule file (TOML) to use instead of the built-in table.
    #[arg(long, conflicts_with = "syntax")]
    pub rules: Option<PathBuf>,

    /// Built-in rule set (python, python-extended).
    #[arg(long)]
    pub syntax: Option<String>,

    /// Keep overlapping spans; the last rule painted wins.
    #[arg(long)]
    pub layered: bool,

    /// Print the span list instead of the highlighted text.
    #[arg(long)]
    pub spans: bool,

    /// Disable ANSI colors.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Show line numbers.
    #[arg(short = 'n', long = "line-numbers")]
    pub line_numbers: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// File with the code to run ("-" reads stdin).
    #[arg(value_name = "FILE", conflicts_with = "code", required_unless_present = "code")]
    pub file: Option<PathBuf>,

    /// Code to run, given inline.
    #[arg(short = 'c', long)]
    pub code: Option<String>,

    /// Kill the run after this many milliseconds.
    #[arg(long = "timeout-ms", value_parser = clap::value_parser!(u64))]
    pub timeout_ms: Option<u64>,

    /// Interpreter to run the code with.
    #[arg(long)]
    pub interpreter: Option<String>,

    /// Feed the code on stdin instead of passing it with -c.
    #[arg(long = "stdin-mode")]
    pub stdin_mode: bool,

    /// Pass the full host environment to the child.
    #[arg(long = "inherit-env")]
    pub inherit_env: bool,
}
