use std::{
    env,
    fs,
    io::{self, BufRead, Write},
    process,
};
use mallow::Engine;

const HELP_MSG: &str = "Usage: mallow [FILE]... [-h|--help]

  FILE  Source file to execute. Without files, read one form per line
        from stdin and print each result.

Set RUST_LOG (e.g. RUST_LOG=mallow=trace) to enable logging.";

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn run_files(files: &[String]) -> bool {
    let mut ok = true;
    for file in files {
        let code = match fs::read_to_string(file) {
            Ok(code) => code,
            Err(err) => {
                eprintln!("Could not read file '{}': {}", file, err);
                ok = false;
                continue;
            },
        };

        if let Err(err) = Engine::default().execute(&code) {
            eprintln!("{}: {}", file, err.describe(&code));
            ok = false;
        }
    }
    ok
}

fn repl() -> io::Result<()> {
    let mut engine = Engine::default();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("user> ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        match engine.rep(&line) {
            Ok(Some(output)) => println!("{}", output),
            Ok(None) => {},
            Err(err) => eprintln!("{}", err.describe(&line)),
        }
    }
    println!();
    Ok(())
}

fn main() {
    init_tracing();

    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", HELP_MSG);
        return;
    }

    if args.is_empty() {
        if let Err(err) = repl() {
            eprintln!("{}", err);
            process::exit(1);
        }
    } else if !run_files(&args) {
        process::exit(1);
    }
}
