use clap::Parser as ClapParser;
use std::fs;
use std::path::PathBuf;
use std::process;
use toy_interpreter::config::{Config, DEFAULT_MAX_CALL_DEPTH};
use toy_interpreter::{parse, repl, tokenize, Error, Interpreter};

/// Interpreter for a small statically typed toy language.
#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Program to run. Starts an interactive prompt when omitted.
    file: Option<PathBuf>,

    /// Print the token stream before running.
    #[arg(long)]
    tokens: bool,

    /// Print the parsed program before running.
    #[arg(long)]
    ast: bool,

    /// Deepest chain of nested function calls allowed.
    #[arg(long, env = "TOY_MAX_CALL_DEPTH", default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let config = Config::default().with_max_call_depth(args.max_call_depth);

    let path = match &args.file {
        Some(path) => path,
        None => {
            println!("Feel free to type in statements");
            repl::start(config);
            return;
        }
    };

    let source = fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("Failed to read '{}': {}", path.display(), err);
        process::exit(1);
    });

    if let Err(err) = execute(&source, &args, config) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn execute(source: &str, args: &Args, config: Config) -> Result<(), Error> {
    let tokens = tokenize(source)?;
    if args.tokens {
        for token in &tokens {
            println!("{}", token);
        }
    }

    let program = parse(tokens)?;
    if args.ast {
        println!("{}", program);
    }

    let state = Interpreter::with_config(config).interpret(&program)?;
    repl::print_state(&state);
    Ok(())
}
