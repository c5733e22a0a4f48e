//! Command-line handling for pi-mill.
//!
//! Hand-rolled parsing: one required positional decimal-place count plus a
//! small set of options. Anything malformed produces an error before any
//! computation starts.

use pimill_core::config::{self, JobConfig, ScheduleMode};

/// Default reference digits file checked after a computation.
pub const DEFAULT_REFERENCE_FILE: &str = "pi_reference_1M.txt";

/// Calculation method selected on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    GaussLegendre,
    Chudnovsky,
}

/// Fully parsed command-line options.
#[derive(Clone, Debug)]
pub struct CliOptions {
    pub decimal_places: u64,
    pub method: Method,
    pub reference_file: String,
    pub debug_level: u8,
    /// None means "use the hardware default".
    pub threads: Option<usize>,
    pub use_dynamic: bool,
    pub chunk_size: u64,
}

impl CliOptions {
    /// Lower the options into the core job configuration.
    pub fn to_job_config(&self) -> JobConfig {
        JobConfig {
            digits: self.decimal_places,
            threads: self.threads.unwrap_or_else(config::default_thread_count),
            mode: if self.use_dynamic {
                ScheduleMode::Dynamic
            } else {
                ScheduleMode::Static
            },
            chunk_size: self.chunk_size,
            debug_level: self.debug_level,
            ..JobConfig::default()
        }
    }
}

/// Outcome of argument parsing.
#[derive(Debug)]
pub enum ParsedArgs {
    Run(CliOptions),
    /// Help was printed; exit successfully without computing.
    Done,
    Error(String),
}

pub fn help_string(program: &str) -> String {
    format!(
        "Usage: {program} <decimal_places> [options]\n\n\
         Options:\n\
         \x20 -f, --file <filename>    Reference pi digits file (default {DEFAULT_REFERENCE_FILE})\n\
         \x20 -d, --debug <0..4>       Diagnostic verbosity (default 0)\n\
         \x20 -m, --method <name>      'gauss_legendre' (default) or 'chudnovsky'\n\
         \x20     --threads <count>    Worker threads for Chudnovsky (default: cores - 1)\n\
         \x20     --dynamic            Dynamic work allocation for Chudnovsky\n\
         \x20     --chunk-size <n>     Terms per dynamic claim (default {chunk})\n\
         \x20 -h, --help               Show this help",
        chunk = config::DEFAULT_CHUNK_SIZE
    )
}

/// Parse `argv` (including the program name at index 0).
pub fn parse_args(argv: &[String]) -> ParsedArgs {
    let mut decimal_places: Option<u64> = None;
    let mut method = Method::GaussLegendre;
    let mut reference_file = DEFAULT_REFERENCE_FILE.to_string();
    let mut debug_level: u8 = 0;
    let mut threads: Option<usize> = None;
    let mut use_dynamic = false;
    let mut chunk_size = config::DEFAULT_CHUNK_SIZE;

    let mut iter = argv.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", help_string(&argv[0]));
                return ParsedArgs::Done;
            }
            "-f" | "--file" => match iter.next() {
                Some(value) => reference_file = value.clone(),
                None => return ParsedArgs::Error(format!("{arg} requires a filename")),
            },
            "-d" | "--debug" => match iter.next().map(|v| v.parse::<u8>()) {
                Some(Ok(level)) if level <= config::MAX_DEBUG_LEVEL => debug_level = level,
                Some(_) => {
                    return ParsedArgs::Error(format!(
                        "{arg} must be 0..={}",
                        config::MAX_DEBUG_LEVEL
                    ));
                }
                None => return ParsedArgs::Error(format!("{arg} requires a level")),
            },
            "-m" | "--method" => match iter.next().map(String::as_str) {
                Some("gauss_legendre") => method = Method::GaussLegendre,
                Some("chudnovsky") => method = Method::Chudnovsky,
                Some(other) => return ParsedArgs::Error(format!("unknown method: {other}")),
                None => return ParsedArgs::Error(format!("{arg} requires a method name")),
            },
            "--threads" => match iter.next().map(|v| v.parse::<usize>()) {
                Some(Ok(count)) if count > 0 => threads = Some(count),
                Some(_) => return ParsedArgs::Error("thread count must be positive".into()),
                None => return ParsedArgs::Error("--threads requires a number".into()),
            },
            "--dynamic" => use_dynamic = true,
            "--chunk-size" => match iter.next().map(|v| v.parse::<u64>()) {
                Some(Ok(size)) if size > 0 => chunk_size = size,
                Some(_) => return ParsedArgs::Error("chunk size must be positive".into()),
                None => return ParsedArgs::Error("--chunk-size requires a number".into()),
            },
            other if other.starts_with('-') => {
                return ParsedArgs::Error(format!("unknown option: {other}"));
            }
            other => {
                if decimal_places.is_some() {
                    return ParsedArgs::Error("multiple decimal place arguments provided".into());
                }
                match other.parse::<u64>() {
                    Ok(places) if places > 0 => decimal_places = Some(places),
                    _ => {
                        return ParsedArgs::Error(format!(
                            "invalid decimal places: {other} (must be a positive integer)"
                        ));
                    }
                }
            }
        }
    }

    match decimal_places {
        Some(decimal_places) => ParsedArgs::Run(CliOptions {
            decimal_places,
            method,
            reference_file,
            debug_level,
            threads,
            use_dynamic,
            chunk_size,
        }),
        None => ParsedArgs::Error("decimal places argument is required".into()),
    }
}
