//! codepad - highlight Python source and run it in a sandboxed interpreter

mod cli;

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process;
use std::time::Duration;

use clap::Parser;
use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, HighlightArgs, RunArgs};
use codepad::config::Config;
use codepad::render::{self, RenderOptions};
use codepad::sandbox::{EnvPolicy, ExecutionRequest, ExecutionResult, Invocation, Sandbox};
use codepad::syntax::{builtin, loader, OverlayPolicy, RuleSet};
use codepad::Result;

/// Exit status when the sandbox killed the run
const EXIT_TIMED_OUT: i32 = 124;
const EXIT_CANCELLED: i32 = 130;

fn main() {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    let config = Config::load();
    match cli.command {
        Command::Highlight(args) => highlight(&config, args),
        Command::Run(args) => run_code(&config, args),
    }
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn select_rules(config: &Config, args: &HighlightArgs) -> Result<RuleSet> {
    let rules = match (&args.rules, &args.syntax) {
        (Some(path), _) => loader::load(path)?,
        (None, Some(name)) => builtin::lookup(name)?.with_policy(config.overlay),
        (None, None) => config.rule_set()?,
    };
    Ok(if args.layered {
        rules.with_policy(OverlayPolicy::Layered)
    } else {
        rules
    })
}

fn highlight(config: &Config, args: HighlightArgs) -> Result<i32> {
    let rules = select_rules(config, &args)?;
    let text = read_source(&args.file)?;

    let stdout = io::stdout();
    let color = !args.no_color && stdout.is_terminal();
    let mut out = stdout.lock();

    if args.spans {
        render::write_spans(&mut out, &text, &rules)?;
    } else {
        let options = RenderOptions {
            tab_width: config.tab_width,
            color,
            line_numbers: args.line_numbers || config.show_line_numbers,
        };
        render::render_text(&mut out, &text, &rules, &options)?;
    }
    Ok(0)
}

fn run_code(config: &Config, args: RunArgs) -> Result<i32> {
    let source = match args.code {
        Some(code) => code,
        None => read_source(args.file.as_deref().unwrap_or(Path::new("-")))?,
    };

    let mut sandbox_config = config.sandbox_config();
    if let Some(interpreter) = args.interpreter {
        sandbox_config.interpreter = interpreter;
    }
    if args.stdin_mode {
        sandbox_config.invocation = Invocation::Stdin;
    }
    if args.inherit_env {
        sandbox_config.env = EnvPolicy::inherit();
    }
    let sandbox = Sandbox::new(sandbox_config);

    let timeout = args
        .timeout_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.timeout());
    let request = ExecutionRequest::new(source).with_timeout(timeout);

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let result = runtime.block_on(async {
        let interrupted = async {
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };
        sandbox.execute_until(request, interrupted).await
    })?;

    io::stdout().write_all(result.stdout.as_bytes())?;
    io::stdout().flush()?;
    io::stderr().write_all(result.stderr.as_bytes())?;
    eprintln!("{}", describe(&result));

    Ok(match result.exit_code {
        Some(code) => code,
        None if result.timed_out => EXIT_TIMED_OUT,
        None => EXIT_CANCELLED,
    })
}

/// One-line outcome summary for the status area
fn describe(result: &ExecutionResult) -> String {
    let elapsed = result.elapsed.as_millis();
    let mut status = if result.timed_out {
        format!("[timed out after {} ms]", elapsed)
    } else if result.cancelled {
        format!("[cancelled after {} ms]", elapsed)
    } else {
        match result.exit_code {
            Some(code) => format!("[exit {} in {} ms]", code, elapsed),
            None => format!("[no exit status after {} ms]", elapsed),
        }
    };
    if result.truncated {
        status.push_str(" (output truncated)");
    }
    status
}
