use crate::config::Config;
use crate::environment::State;
use crate::interpreter::Interpreter;
use crate::lexer::tokenize;
use crate::parser::parse;
use std::io::{self, Write};

static PROMPT: &str = ">> ";

/// Reads statements line by line; declarations persist across lines.
pub fn start(config: Config) {
    let mut interpreter = Interpreter::with_config(config);
    loop {
        print!("{}", PROMPT);
        let _ = io::stdout().flush();
        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        if line.trim().is_empty() {
            continue;
        }

        let program = match tokenize(&line) {
            Ok(tokens) => parse(tokens),
            Err(err) => {
                println!("\t{}", err);
                continue;
            }
        };

        match program {
            Err(err) => println!("\t{}", err),
            Ok(program) => match interpreter.interpret(&program) {
                Ok(state) => print_state(&state),
                Err(err) => println!("ERROR: {}", err),
            },
        }
    }
}

pub fn print_state(state: &State) {
    for (name, value) in state {
        println!("{} = {}", name, value);
    }
}
