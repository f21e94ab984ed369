//! The `coltc` driver: parse one source file and report diagnostics.

use std::path::PathBuf;

use anyhow::{bail, Context};
use coltc_par::{create_ast, AstContext};
use coltc_util::diagnostic::print_diagnostic;
use coltc_util::{DiagnosticConfig, Handler};

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> anyhow::Result<i32> {
    let mut config = DiagnosticConfig::default();
    let mut path: Option<PathBuf> = None;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--no-color" => config.colored = false,
            "--no-error" => config.no_error = true,
            "--no-warning" => config.no_warning = true,
            "--no-message" => config.no_message = true,
            _ if arg.starts_with('-') => bail!("unknown option '{}'", arg),
            _ => {
                if path.replace(PathBuf::from(&arg)).is_some() {
                    bail!("expected a single input file");
                }
            }
        }
    }
    let Some(path) = path else {
        bail!("usage: coltc [--no-color] [--no-error] [--no-warning] [--no-message] <file>");
    };

    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("cannot read '{}'", path.display()))?;

    let mut ctx = AstContext::new();
    let handler = Handler::new();
    let result = create_ast(&source, &mut ctx, &handler);

    for diag in handler.diagnostics() {
        print_diagnostic(&diag, &source, &config);
    }

    match result {
        Ok(ast) => {
            println!(
                "parsed {} top-level expression(s), {} warning(s)",
                ast.exprs.len(),
                handler.warning_count()
            );
            Ok(0)
        }
        Err(e) => {
            eprintln!("{}", e);
            Ok(1)
        }
    }
}
