//! pi-mill binary: compute pi to a requested number of decimal places,
//! write it to `computed_pi.txt`, and check it against a reference digits
//! file.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use console::style;
use rug::Float;

use pimill_cli::args::{self, CliOptions, Method, ParsedArgs};
use pimill_cli::signal;
use pimill_core::monitor::SystemMonitor;
use pimill_core::{
    CancelHandle, Diag, Dispatcher, PiError, Progress, Verification, finalize, gauss, output,
    verify,
};

/// Exit status for a caller-initiated cancellation, distinct from plain
/// failure.
const EXIT_CANCELLED: u8 = 130;

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().collect();
    let options = match args::parse_args(&argv) {
        ParsedArgs::Run(options) => options,
        ParsedArgs::Done => return ExitCode::SUCCESS,
        ParsedArgs::Error(message) => {
            eprintln!("Error: {message}");
            eprintln!("{}", args::help_string(&argv[0]));
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancelHandle::new();
    if let Err(e) = signal::install_sigint(&cancel) {
        eprintln!("Warning: could not install SIGINT handler: {e}");
    }

    match run(&options, &cancel) {
        Ok(()) => ExitCode::SUCCESS,
        Err(PiError::Cancelled) => {
            eprintln!("Calculation aborted by user.");
            ExitCode::from(EXIT_CANCELLED)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(options: &CliOptions, cancel: &CancelHandle) -> Result<(), PiError> {
    let config = options.to_job_config();
    config.validate()?;

    let sink = Arc::new(Diag::new(config.debug_level));
    let progress = Arc::new(Progress::new());
    let monitor = (config.debug_level >= 1)
        .then(|| SystemMonitor::start(Arc::clone(&progress), Arc::clone(&sink)));

    let result = compute(options, cancel, &progress, &sink);

    if let Some(monitor) = monitor {
        monitor.stop();
    }
    let computed = result?;

    output::write_pi_file(Path::new(output::RESULT_FILE), &computed)?;

    match verify::verify_pi(
        &computed,
        Path::new(&options.reference_file),
        options.decimal_places,
    ) {
        Ok(outcome) => print_verification(&outcome),
        Err(e) => eprintln!(
            "Warning: could not verify against {}: {e}",
            options.reference_file
        ),
    }
    Ok(())
}

fn compute(
    options: &CliOptions,
    cancel: &CancelHandle,
    progress: &Arc<Progress>,
    sink: &Arc<Diag>,
) -> Result<String, PiError> {
    let pi: Float = match options.method {
        Method::GaussLegendre => {
            eprintln!("[pi-mill] Gauss-Legendre, {} places", options.decimal_places);
            gauss::calculate_pi(options.decimal_places, cancel)?
        }
        Method::Chudnovsky => {
            let config = options.to_job_config();
            eprintln!(
                "[pi-mill] Chudnovsky, {} places, {} threads, {:?} dispatch",
                options.decimal_places, config.threads, config.mode
            );
            let mut dispatcher =
                Dispatcher::new(config, Arc::clone(progress), Arc::clone(sink));
            dispatcher.run(cancel)?
        }
    };
    Ok(finalize::format_pi(&pi, options.decimal_places))
}

fn print_verification(outcome: &Verification) {
    match outcome {
        Verification::Match => {
            println!("Pi verification: {}", style("SUCCESS").green().bold());
        }
        Verification::Mismatch {
            decimal_place,
            reference_context,
            computed_context,
        } => {
            println!("Pi verification: {}", style("FAILED").red().bold());
            println!("First mismatch at decimal place {decimal_place}");
            println!("Reference: {reference_context}");
            println!("Computed : {computed_context}");
        }
        Verification::Unknown {
            requested,
            available,
        } => {
            println!(
                "{}",
                style(format!(
                    "Pi verification: UNKNOWN (requested {requested} places exceeds reference file length of {available})"
                ))
                .blue()
                .bold()
            );
        }
    }
}
