use clap::Parser;
use sortdir::cli::{Args, init_tracing, print_report, run_cli};
use sortdir::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let report = match run_cli(&args) {
        Ok(report) => report,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    // Per-file failures are reported but do not change the exit status.
    if let Err(e) = print_report(&report, args.json) {
        OutputFormatter::error(&format!("Could not render report: {}", e));
    }
    ExitCode::SUCCESS
}
