//! Command-line front end: read a JavaScript file (or stdin), write the
//! minified form to stdout (or a file).

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use minjs_drv::{Config, OutputMode, Session};

struct Args {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    pretty: bool,
    term_semicolons: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        input: None,
        output: None,
        pretty: false,
        term_semicolons: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                let path = iter.next().context("missing path after -o")?;
                args.output = Some(PathBuf::from(path));
            }
            "-p" | "--pretty" => args.pretty = true,
            "--term" => args.term_semicolons = true,
            "-h" | "--help" => {
                eprintln!("usage: minjs [-o OUTPUT] [--pretty] [--term] [INPUT]");
                std::process::exit(0);
            }
            _ if arg.starts_with('-') => bail!("unknown option: {}", arg),
            _ => {
                if args.input.is_some() {
                    bail!("more than one input file given");
                }
                args.input = Some(PathBuf::from(arg));
            }
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    let args = parse_args()?;

    let (name, source) = match &args.input {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            (path.display().to_string(), source)
        }
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("failed to read stdin")?;
            ("<stdin>".to_string(), source)
        }
    };

    let mut config = Config::new(name);
    if args.pretty {
        config.output.output_mode = OutputMode::MultipleLines;
    }
    config.output.term_semicolons = args.term_semicolons;

    let session = Session::new(config);
    let output = session.minify(&source);

    for diagnostic in &output.diagnostics {
        eprintln!("{}: {}", session.config().file_name, diagnostic);
    }

    match &args.output {
        Some(path) => std::fs::write(path, output.code.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", output.code),
    }

    if output.diagnostics.iter().any(|d| d.is_error()) {
        std::process::exit(1);
    }
    Ok(())
}
