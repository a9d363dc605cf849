pub mod ast;
pub mod config;
pub mod environment;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod token;
pub mod value;

use custom_error::custom_error;

pub use config::Config;
pub use environment::State;
pub use interpreter::Interpreter;
pub use lexer::{tokenize, LexError};
pub use parser::{parse, ParseError, Parser};
pub use value::{RuntimeError, Value};

custom_error! {
    #[derive(Clone, PartialEq)]
    pub Error

    Lex{source: LexError} = "lexical error: {source}",
    Parse{source: ParseError} = "parse error: {source}",
    Runtime{source: RuntimeError} = "runtime error: {source}",
}

/// Lexes, parses and executes `source`, returning the final global variables.
pub fn run(source: &str) -> Result<State, Error> {
    run_with_config(source, Config::default())
}

pub fn run_with_config(source: &str, config: Config) -> Result<State, Error> {
    let tokens = tokenize(source)?;
    let program = parse(tokens)?;
    let state = Interpreter::with_config(config).interpret(&program)?;
    Ok(state)
}
