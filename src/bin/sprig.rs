use anyhow::Context;
use clap::Parser as ClapParser;
use sprig::{ExecutionConfig, Interpreter, Parser, StdConsole};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(ClapParser, Debug)]
#[command(name = "sprig")]
#[command(version = sprig::VERSION)]
#[command(about = "Run a Sprig script", long_about = None)]
struct Args {
    /// Script to execute
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Abort any single loop after N iterations
    #[arg(long = "max-iterations", value_name = "N")]
    max_iterations: Option<usize>,

    /// Accept `a[i] = v` and `m.k = v` without changing the container
    #[arg(long = "no-indexed-assignment")]
    no_indexed_assignment: bool,

    /// Print the parsed program as JSON instead of running it
    #[arg(long = "dump-ast")]
    dump_ast: bool,
}

impl Args {
    fn config(&self) -> ExecutionConfig {
        let mut config =
            ExecutionConfig::default().with_indexed_assignment(!self.no_indexed_assignment);
        if let Some(limit) = self.max_iterations {
            config = config.with_max_iterations(limit);
        }
        config
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let source = match std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))
    {
        Ok(source) => source,
        Err(err) => {
            eprintln!("sprig: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    match run(&args, &source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Outcome::Script(err)) => {
            // Diagnostics go to standard output
            println!("{}", err);
            ExitCode::FAILURE
        }
        Err(Outcome::Host(err)) => {
            eprintln!("sprig: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

enum Outcome {
    Script(sprig::Error),
    Host(anyhow::Error),
}

fn run(args: &Args, source: &str) -> Result<(), Outcome> {
    let program = Parser::from_source(source)
        .parse()
        .map_err(Outcome::Script)?;

    if args.dump_ast {
        let json = serde_json::to_string_pretty(&program)
            .context("failed to serialize program")
            .map_err(Outcome::Host)?;
        println!("{}", json);
        return Ok(());
    }

    let mut interpreter = Interpreter::with_config(StdConsole, args.config());
    interpreter.run(&program).map_err(Outcome::Script)
}
