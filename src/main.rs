use std::process;

use sbench::bench::{install_signal_handlers, InterruptSignal, Pipeline};
use sbench::cli::{self, Invocation};
use sbench::error::{self, EXIT_INTERNAL, EXIT_SUCCESS};
use sbench::models::RunReport;
use sbench::util::logging;

#[tokio::main]
async fn main() {
    let args = match cli::parse(std::env::args_os()) {
        Invocation::Run(args) => args,
        Invocation::Exit {
            code,
            output,
            is_error,
        } => {
            if is_error {
                eprint!("{}", output);
            } else {
                print!("{}", output);
            }
            process::exit(code);
        }
    };

    logging::init(logging::level_for(args.verbose, args.quiet));
    let json = args.json;
    let config = args.into_config();

    // Signals only raise the flag; the pipeline notices it and unwinds through cleanup
    let interrupt = InterruptSignal::new();
    if let Err(e) = install_signal_handlers(&interrupt) {
        tracing::warn!("Unable to install signal handlers: {}", e);
    }

    let pipeline = Pipeline::new(config, interrupt);
    let outcome = tokio::task::spawn_blocking(move || pipeline.run()).await;

    let code = match outcome {
        Ok(Ok(report)) => print_report(&report, json),
        Ok(Err(e)) if !e.is_failure() => {
            tracing::warn!("{}", e);
            e.exit_code()
        }
        Ok(Err(e)) => {
            tracing::error!("{}", error::user_friendly_message(&e));
            e.exit_code()
        }
        Err(e) => {
            tracing::error!("Benchmark worker failed: {}", e);
            EXIT_INTERNAL
        }
    };

    process::exit(code);
}

fn print_report(report: &RunReport, json: bool) -> i32 {
    if !json {
        println!("{}", report.render());
        return EXIT_SUCCESS;
    }

    match report.to_json() {
        Ok(text) => {
            println!("{}", text);
            EXIT_SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to serialize report: {}", e);
            EXIT_INTERNAL
        }
    }
}
