use std::env;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format;

use self::args::{Args, Command};
use self::evaluate::run_evaluate;
use self::inspect::run_inspect;
use self::predict::run_predict;
use self::random::run_random;

mod args;
mod evaluate;
mod inspect;
mod model;
mod predict;
mod random;

fn main() -> ExitCode {
    let args = Args::parse();

    set_default_logging();

    let event_format = format().with_target(false).without_time();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .event_format(event_format)
        .init();

    match args.command {
        Command::Evaluate(config) => run_evaluate(config),
        Command::Predict(config) => run_predict(config),
        Command::Inspect(config) => run_inspect(config),
        Command::Random(config) => run_random(config),
    }
}

fn set_default_logging() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
}
