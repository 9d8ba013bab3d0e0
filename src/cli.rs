//! Command-line interface
//!
//! `sbench [OPTIONS] <OUTPUT_PATH> [SIZE_MB]`. Parsing never exits the
//! process itself; [`parse`] hands back either the arguments or the text and
//! exit code the binary should finish with.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::builder::TypedValueParser;
use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};

use crate::config::{BenchmarkConfig, CacheDrop};
use crate::error::{EXIT_SUCCESS, EXIT_USAGE};
use crate::{APP_NAME, DEFAULT_SIZE_MB, VERSION};

/// Largest accepted `--buffer-kib` (1 GiB)
const MAX_BUFFER_KIB: u64 = 1024 * 1024;

/// Sequential write/read disk throughput benchmark
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = APP_NAME, version)]
pub struct Args {
    /// File to create, benchmark and remove
    // Empty values reach `parse`, which answers them with the banner
    #[arg(
        value_name = "OUTPUT_PATH",
        value_parser = clap::builder::OsStringValueParser::new().map(PathBuf::from)
    )]
    pub output_path: PathBuf,

    /// Size of the benchmark file in megabytes
    #[arg(
        value_name = "SIZE_MB",
        default_value_t = DEFAULT_SIZE_MB,
        value_parser = parse_size_mb,
        allow_negative_numbers = true
    )]
    pub size_mb: u64,

    /// I/O buffer size in KiB
    #[arg(
        long = "buffer-kib",
        value_name = "KIB",
        default_value_t = 1024,
        value_parser = clap::value_parser!(u64).range(1..=MAX_BUFFER_KIB)
    )]
    pub buffer_kib: u64,

    /// Do not evict the page cache before reading (the read figure may be served from cache)
    #[arg(long = "skip-cache-drop")]
    pub skip_cache_drop: bool,

    /// Command run instead of the platform's cache eviction command
    #[arg(long = "cache-drop-command", value_name = "CMD", conflicts_with = "skip_cache_drop")]
    pub cache_drop_command: Option<String>,

    /// Do not fsync the file before closing it
    #[arg(long = "no-sync")]
    pub no_sync: bool,

    /// Leave the benchmark file in place
    #[arg(long = "keep")]
    pub keep: bool,

    /// Print the final report as JSON
    #[arg(long = "json")]
    pub json: bool,

    /// More logging, repeat for even more
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// What the binary should do after parsing
#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    Run(Args),
    /// Print `output` (stderr when `is_error`) and exit with `code`
    Exit {
        code: i32,
        output: String,
        is_error: bool,
    },
}

impl Args {
    /// Build the immutable benchmark configuration
    pub fn into_config(self) -> BenchmarkConfig {
        let cache_drop = match (self.skip_cache_drop, self.cache_drop_command) {
            (true, _) => CacheDrop::Skip,
            (false, Some(line)) => CacheDrop::from_command_line(&line),
            (false, None) => CacheDrop::System,
        };

        BenchmarkConfig::new(self.output_path)
            .with_size_mb(self.size_mb)
            // bounded by MAX_BUFFER_KIB
            .with_buffer_size((self.buffer_kib * 1024) as usize)
            .with_cache_drop(cache_drop)
            .with_sync(!self.no_sync)
            .with_keep_file(self.keep)
            .with_progress(!self.quiet && !self.json)
    }
}

/// Parse `argv` (program name first)
pub fn parse<I, T>(argv: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match Args::try_parse_from(argv) {
        Ok(args) => args,
        Err(err) => {
            let rendered = err.render().to_string();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Invocation::Exit {
                    code: EXIT_SUCCESS,
                    output: rendered,
                    is_error: false,
                },
                // Missing or unrecognised arguments get the full banner
                ErrorKind::MissingRequiredArgument
                | ErrorKind::UnknownArgument
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => usage_error(&rendered),
                _ => Invocation::Exit {
                    code: EXIT_USAGE,
                    output: rendered,
                    is_error: true,
                },
            };
        }
    };

    // `--` lets a path through that clap would otherwise read as a flag
    let path = args.output_path.as_os_str().to_string_lossy();
    if path.is_empty() || path.starts_with('-') {
        return usage_error(&format!(
            "error: invalid OUTPUT_PATH '{}': must be non-empty and not begin with '-'\n",
            path
        ));
    }

    Invocation::Run(args)
}

/// "Simple SSD Benchmark <version>"
pub fn banner() -> String {
    format!("Simple SSD Benchmark {}", VERSION)
}

fn usage_error(detail: &str) -> Invocation {
    let usage = Args::command().render_usage().to_string();
    let detail = detail.trim_end();
    // clap's own rendering already carries the usage line
    let output = if detail.contains(&usage) {
        format!("{}\n\n{}\n", banner(), detail)
    } else {
        format!("{}\n\n{}\n\n{}\n", banner(), detail, usage)
    };
    Invocation::Exit {
        code: EXIT_USAGE,
        output,
        is_error: true,
    }
}

/// Parse SIZE_MB: optional sign and leading whitespace, then decimal digits
/// and nothing else, strictly positive
fn parse_size_mb(s: &str) -> Result<u64, String> {
    let fail = |why: &str| format!("Failed to parse SIZE_MB ({})", why);

    let body = s.trim_start();
    let digits_start = usize::from(body.starts_with(['+', '-']));
    let digits_len = body[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return Err(fail("not a number"));
    }

    let (number, rest) = body.split_at(digits_start + digits_len);
    let mb: i64 = number.parse().map_err(|_| fail("out of range"))?;
    if mb <= 0 {
        return Err(fail("must be > 0"));
    }
    if !rest.is_empty() {
        return Err(fail("extra characters at end of string"));
    }
    u64::try_from(mb).map_err(|_| fail("out of range"))
}
