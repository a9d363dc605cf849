use std::env;
use std::time::Instant;
use toy_interpreter::{parse, tokenize, Config, Interpreter};

static FIBONACCI: &str = "func fibonacci(x: int): int {
    if x < 2 {
        return x;
    }
    return fibonacci(x - 1) + fibonacci(x - 2);
}";

fn main() {
    let n: u32 = env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(25);

    let source = format!("{}\nvar result: int = fibonacci({});", FIBONACCI, n);
    let tokens = tokenize(&source).expect("Lex errors found");
    let program = parse(tokens).expect("Parse errors found");
    let mut interpreter = Interpreter::with_config(Config::default());

    let start = Instant::now();
    let state = interpreter.interpret(&program).expect("Runtime error");
    let duration = start.elapsed();

    println!(
        "n={}, result={}, duration={}",
        n,
        state["result"],
        duration.as_secs_f64(),
    );
}
