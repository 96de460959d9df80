use clap::Parser;
use miette::{NamedSource, Report};
use sprig::{InterpreterConfig, config::DEFAULT_MAX_DEPTH};
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Stop after lexing and print the tokens
    #[arg(long, conflicts_with_all = ["parse", "validate"])]
    lex: bool,

    /// Stop after parsing and print the AST
    #[arg(long, conflicts_with_all = ["lex", "validate"])]
    parse: bool,

    /// Stop after semantic analysis and print the annotated AST
    #[arg(long, conflicts_with_all = ["lex", "parse"])]
    validate: bool,

    /// Maximum number of activation records on the call stack
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if !args.file.is_file() {
        eprintln!("error: input must be a file");
        std::process::exit(1);
    }

    let source = match std::fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&args, &source) {
        let name = args.file.display().to_string();
        let report = Report::new(e).with_source_code(NamedSource::new(name, source));
        eprintln!("{report:?}");
        std::process::exit(1);
    }
}

fn run(args: &Args, source: &str) -> Result<(), sprig::Error> {
    if args.lex {
        let tokens = sprig::lex(source)?;
        tokens.iter().for_each(|tok| println!("{tok}"));
        return Ok(());
    }

    let mut module = sprig::parse(source)?;
    if args.parse {
        println!("{module:#?}");
        return Ok(());
    }

    sprig::analyze(&mut module)?;
    if args.validate {
        println!("{module:#?}");
        return Ok(());
    }

    tracing::info!(file = %args.file.display(), max_depth = args.max_depth, "running");
    let program = sprig::interpret(&module, InterpreterConfig::with_max_depth(args.max_depth))?;
    print!("{program}");

    Ok(())
}
