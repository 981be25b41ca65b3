use clap::Parser;
use stonkline::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
