use std::io::Read;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use formel_eval::{Environment, Formula};
use formel_parse::parse_str;

/// Maximum formula size in bytes
const MAX_SOURCE_SIZE: usize = 64 * 1024;

#[derive(Parser, Debug)]
#[command(name = "formel")]
#[command(about = "Formel: evaluate small arithmetic and assignment formulas")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a formula and print its value
    Eval {
        /// Formula text, or '-' to read it from stdin
        expr: String,

        /// Keep oversized numeric literals verbatim instead of rounding
        #[arg(long)]
        keep_big_literals: bool,

        /// Write a token/tree trace to stderr before evaluating
        #[arg(long)]
        debug: bool,
    },

    /// Scan a formula and list its tokens
    Scan {
        /// Formula text, or '-' to read it from stdin
        expr: String,

        /// Keep oversized numeric literals verbatim instead of rounding
        #[arg(long)]
        keep_big_literals: bool,
    },

    /// Parse a formula and dump the tree
    Parse {
        /// Formula text, or '-' to read it from stdin
        expr: String,

        /// Keep oversized numeric literals verbatim instead of rounding
        #[arg(long)]
        keep_big_literals: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
}

#[derive(ValueEnum, Clone, Debug)]
enum Format {
    Pretty,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Eval {
            expr,
            keep_big_literals,
            debug,
        } => cmd_eval(&load(&expr)?, keep_big_literals, debug),

        Commands::Scan {
            expr,
            keep_big_literals,
        } => cmd_scan(&load(&expr)?, keep_big_literals),

        Commands::Parse {
            expr,
            keep_big_literals,
            format,
        } => cmd_parse(&load(&expr)?, keep_big_literals, format),
    }
}

fn load(expr: &str) -> Result<String> {
    let src = if expr == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        expr.to_string()
    };
    anyhow::ensure!(
        src.len() <= MAX_SOURCE_SIZE,
        "formula exceeds {}KB limit ({} bytes)",
        MAX_SOURCE_SIZE / 1024,
        src.len()
    );
    Ok(src)
}

fn formula(src: &str, keep_big: bool) -> Formula {
    if keep_big {
        Formula::keep_big_literals(src)
    } else {
        Formula::new(src)
    }
}

fn cmd_eval(src: &str, keep_big: bool, debug: bool) -> Result<()> {
    let mut f = formula(src, keep_big);
    if debug {
        f.dump(&mut std::io::stderr())?;
    }
    let mut env = Environment::new();
    let value = f.result(&mut env)?;
    println!("{value}");
    Ok(())
}

fn cmd_scan(src: &str, keep_big: bool) -> Result<()> {
    for tok in formula(src, keep_big).tokens() {
        let t = tok?;
        match &t.value {
            Some(v) => println!("{:?} @ {}..{} = {}", t.kind, t.span.start, t.span.end, v),
            None => println!("{:?} @ {}..{}", t.kind, t.span.start, t.span.end),
        }
    }
    Ok(())
}

fn cmd_parse(src: &str, keep_big: bool, format: Format) -> Result<()> {
    let program = parse_str(src, keep_big)?;
    match format {
        Format::Pretty => println!("{program:#?}"),
        Format::Json => println!("{}", serde_json::to_string_pretty(&program)?),
    }
    Ok(())
}
