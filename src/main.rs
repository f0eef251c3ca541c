use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use verse_align::cli::{Cli, Command};
use verse_align::logging::{init_logging, LogConfig};
use verse_align::protocol;
use verse_align::services::{config, encoding, pipeline, store};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(
        &LogConfig::from_flags(cli.verbose, cli.quiet)
            .with_format(cli.log_format)
            .with_ansi(!cli.no_color),
    );

    let mut cfg = config::load(cli.config.as_deref()).context("failed to load run file")?;

    match cli.command {
        Command::Index(args) => {
            let output = args.apply(&mut cfg);
            let index = pipeline::run_index(&cfg, output.as_deref()).context("index failed")?;
            print_json(&serde_json::json!({ "verses": index.len() }))?;
        }
        Command::Locate(args) => {
            args.apply(&mut cfg);
            let report = pipeline::run_locate(&cfg).context("locate failed")?;
            print_json(&report.stats)?;
        }
        Command::Merge(args) => {
            args.apply(&mut cfg);
            let report = pipeline::run_merge(&cfg).context("merge failed")?;
            print_json(&report)?;
        }
        Command::Verify(args) => {
            args.apply(&mut cfg);
            let issues = pipeline::run_verify(&cfg).context("verify failed")?;
            print_json(&issues)?;
            if !issues.is_empty() {
                std::process::exit(2);
            }
        }
        Command::DetectEncoding { path } => {
            let result = encoding::detect_from_file(&path)
                .with_context(|| format!("failed to inspect {}", path.display()))?;
            print_json(&result)?;
        }
        Command::Serve => serve(),
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let bytes = store::to_pretty_json(value)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(&bytes)?;
    writeln!(stdout)?;
    Ok(())
}

fn serve() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    tracing::info!("serving JSON-lines requests on stdin");

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read request line");
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let result = std::panic::catch_unwind(|| protocol::handle(&line));

        let response = match result {
            Ok(resp) => resp,
            Err(_) => {
                tracing::error!("request handler panicked");
                serde_json::json!({
                    "status": "error",
                    "message": "internal core error"
                })
                .to_string()
            }
        };

        if writeln!(stdout, "{response}").is_err() {
            break;
        }

        let _ = stdout.flush();
    }
}
