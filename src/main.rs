use clap::Parser;
use quantbot::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
