//! SEPTET CLI
//!
//! In-place run-length codec for 7-bit byte streams.
//!
//! Reads delimited integers from a file or stdin and prints the result in
//! the same comma-separated form, so commands compose through pipes:
//!
//! ```text
//! echo 1,2,2,2,3 | septet compress | septet decompress
//! ```

mod config;
mod ingest;
mod present;
mod verify;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use septet_core::{CodecError, CompressionStats, DecodeOptions, ErrorKind};

use config::Config;
use ingest::IngestError;
use present::OutputFormat;

/// SEPTET - run-length codec for 7-bit byte streams
#[derive(Parser)]
#[command(name = "septet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output (implies --verbose)
    #[arg(short, long)]
    debug: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Print compression statistics to stderr
    #[arg(long)]
    stats: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress delimited 7-bit values
    Compress {
        /// Input file (stdin if omitted or "-")
        input: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Decompress delimited compressed bytes
    Decompress {
        /// Input file (stdin if omitted or "-")
        input: Option<PathBuf>,

        /// Destination capacity in bytes (exact decoded size if omitted)
        #[arg(long)]
        capacity: Option<usize>,

        /// Accept run tokens with a length of 0 or 1
        #[arg(long)]
        lenient: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Round-trip CSV files and report the reduction for each
    Verify {
        /// CSV files or directories containing them
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Number format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Separator between values
    #[arg(short, long)]
    separator: Option<String>,
}

/// One or more files failed verification
#[derive(Debug, Error)]
#[error("{failed} of {total} files failed verification")]
struct VerificationFailed {
    failed: usize,
    total: usize,
}

// ═══════════════════════════════════════════════════════════════════════════
// Exit codes
// ═══════════════════════════════════════════════════════════════════════════

const EXIT_OTHER: u8 = 1;
const EXIT_INGEST: u8 = 2;
const EXIT_VERIFY: u8 = 7;

fn codec_exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::InvalidHandle => 3,
        ErrorKind::OutOfRangeLiteral => 4,
        ErrorKind::MalformedStream => 5,
        ErrorKind::DestinationOverflow => 6,
    }
}

/// Map an error chain to a process exit code
fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<CodecError>() {
            return codec_exit_code(e.kind());
        }
        if cause.downcast_ref::<IngestError>().is_some() {
            return EXIT_INGEST;
        }
        if cause.downcast_ref::<VerificationFailed>().is_some() {
            return EXIT_VERIFY;
        }
    }
    EXIT_OTHER
}

// ═══════════════════════════════════════════════════════════════════════════
// Helper Functions
// ═══════════════════════════════════════════════════════════════════════════

fn init_logging(cli: &Cli, config: &Config) {
    let filter = if cli.debug {
        EnvFilter::new("trace")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Read all input text from a file, or stdin for `None` / `-`
fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read {}", p.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Apply command-line output overrides on top of the config file
fn output_settings(args: &OutputArgs, config: &Config) -> (OutputFormat, String) {
    (
        args.format.unwrap_or(config.output.format),
        args.separator
            .clone()
            .unwrap_or_else(|| config.output.separator.clone()),
    )
}

fn collect_stats(
    enabled: bool,
    compressed: &[u8],
    options: DecodeOptions,
) -> anyhow::Result<Option<CompressionStats>> {
    if !enabled {
        return Ok(None);
    }
    Ok(Some(CompressionStats::from_compressed(compressed, options)?))
}

/// Output of a codec command
#[derive(Debug)]
struct Rendered {
    /// Delimited values for stdout
    body: String,
    /// Statistics for stderr, when `--stats` is set
    stats: Option<CompressionStats>,
}

impl Rendered {
    fn emit(&self) {
        if let Some(stats) = &self.stats {
            eprintln!("{stats}");
        }
        println!("{}", self.body);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════

fn compress_text(
    text: &str,
    output: &OutputArgs,
    stats: bool,
    config: &Config,
) -> anyhow::Result<Rendered> {
    let mut buf = ingest::parse_bytes(text, &config.input)?;

    let len = septet_core::compress(&mut buf).context("Compression failed")?;
    buf.truncate(len);
    tracing::info!(compressed_len = len, "compressed input");

    let (format, separator) = output_settings(output, config);
    Ok(Rendered {
        stats: collect_stats(stats, &buf, DecodeOptions::strict())?,
        body: present::render(&buf, format, &separator),
    })
}

fn decompress_text(
    text: &str,
    capacity: Option<usize>,
    lenient: bool,
    output: &OutputArgs,
    stats: bool,
    config: &Config,
) -> anyhow::Result<Rendered> {
    let src = ingest::parse_bytes(text, &config.input)?;

    let options = if lenient || config.decode.lenient {
        DecodeOptions::lenient()
    } else {
        DecodeOptions::strict()
    };

    let needed = septet_core::decompressed_len(&src, options).context("Decompression failed")?;
    // Capacity past the decoded length is never written
    let capacity = capacity.map_or(needed, |cap| cap.min(needed));

    let mut dst = vec![0u8; capacity];
    let len =
        septet_core::decompress_with(&src, &mut dst, options).context("Decompression failed")?;
    dst.truncate(len);
    tracing::info!(decompressed_len = len, "decompressed input");

    let (format, separator) = output_settings(output, config);
    Ok(Rendered {
        stats: collect_stats(stats, &src, options)?,
        body: present::render(&dst, format, &separator),
    })
}

fn verify_command(
    paths: &[PathBuf],
    config: &Config,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let files = verify::collect_files(paths)?;
    let mut failed = 0;

    writeln!(out, "{:<7} {:<40} Result", "Test #", "File")?;
    writeln!(out, "{}", "-".repeat(72))?;
    for (i, file) in files.iter().enumerate() {
        let outcome = verify::verify_path(file, &config.input);
        if !outcome.passed() {
            failed += 1;
        }
        writeln!(out, "{:<7} {:<40} {}", i + 1, file.display(), outcome)?;
    }
    writeln!(out, "{}", "-".repeat(72))?;
    writeln!(
        out,
        "Total: {} | Passed: {} | Failed: {}",
        files.len(),
        files.len() - failed,
        failed
    )?;

    if failed > 0 {
        return Err(VerificationFailed {
            failed,
            total: files.len(),
        }
        .into());
    }
    Ok(())
}

fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Compress { input, output } => {
            let text = read_input(input.as_deref())?;
            compress_text(&text, output, cli.stats, &config)?.emit();
            Ok(())
        }
        Commands::Decompress {
            input,
            capacity,
            lenient,
            output,
        } => {
            let text = read_input(input.as_deref())?;
            decompress_text(&text, *capacity, *lenient, output, cli.stats, &config)?.emit();
            Ok(())
        }
        Commands::Verify { paths } => {
            verify_command(paths, &config, &mut std::io::stdout().lock())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::resolve(cli.config.as_deref()).and_then(|c| {
        c.validate()?;
        Ok(c)
    }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(EXIT_OTHER);
        }
    };

    init_logging(&cli, &config);
    tracing::debug!(?config, "configuration loaded");

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("{e:?}");
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_compress_stdin() {
        let cli = Cli::parse_from(["septet", "compress"]);
        match cli.command {
            Commands::Compress { input, output } => {
                assert!(input.is_none());
                assert!(output.format.is_none());
                assert!(output.separator.is_none());
            }
            _ => panic!("Expected Compress command"),
        }
        assert!(!cli.stats);
    }

    #[test]
    fn test_cli_parse_compress_file_hex() {
        let cli = Cli::parse_from(["septet", "--stats", "compress", "data.csv", "-f", "hex"]);
        match cli.command {
            Commands::Compress { input, output } => {
                assert_eq!(input, Some(PathBuf::from("data.csv")));
                assert_eq!(output.format, Some(OutputFormat::Hex));
            }
            _ => panic!("Expected Compress command"),
        }
        assert!(cli.stats);
    }

    #[test]
    fn test_cli_parse_decompress_defaults() {
        let cli = Cli::parse_from(["septet", "decompress"]);
        match cli.command {
            Commands::Decompress {
                input,
                capacity,
                lenient,
                ..
            } => {
                assert!(input.is_none());
                assert!(capacity.is_none());
                assert!(!lenient);
            }
            _ => panic!("Expected Decompress command"),
        }
    }

    #[test]
    fn test_cli_parse_decompress_options() {
        let cli = Cli::parse_from([
            "septet",
            "decompress",
            "-",
            "--capacity",
            "64",
            "--lenient",
            "--separator",
            ";",
        ]);
        match cli.command {
            Commands::Decompress {
                input,
                capacity,
                lenient,
                output,
            } => {
                assert_eq!(input, Some(PathBuf::from("-")));
                assert_eq!(capacity, Some(64));
                assert!(lenient);
                assert_eq!(output.separator.as_deref(), Some(";"));
            }
            _ => panic!("Expected Decompress command"),
        }
    }

    #[test]
    fn test_cli_parse_verify_requires_paths() {
        assert!(Cli::try_parse_from(["septet", "verify"]).is_err());

        let cli = Cli::parse_from(["septet", "verify", "a.csv", "fixtures"]);
        match cli.command {
            Commands::Verify { paths } => {
                assert_eq!(paths, vec![PathBuf::from("a.csv"), PathBuf::from("fixtures")]);
            }
            _ => panic!("Expected Verify command"),
        }
    }

    #[test]
    fn test_cli_verbose_debug_flags() {
        let cli = Cli::parse_from(["septet", "-v", "-d", "-c", "~/septet.toml", "compress"]);
        assert!(cli.verbose);
        assert!(cli.debug);
        assert_eq!(cli.config.as_deref(), Some("~/septet.toml"));
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors: Vec<anyhow::Error> = vec![
            anyhow::anyhow!("other"),
            IngestError::TooManyValues { limit: 1 }.into(),
            CodecError::InvalidHandle("data").into(),
            CodecError::OutOfRangeLiteral {
                offset: 0,
                value: 200,
            }
            .into(),
            CodecError::MalformedStream { offset: 0 }.into(),
            CodecError::DestinationOverflow {
                capacity: 0,
                required: 1,
            }
            .into(),
            VerificationFailed {
                failed: 1,
                total: 1,
            }
            .into(),
        ];

        let codes: Vec<u8> = errors.iter().map(exit_code).collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_exit_code_through_context() {
        let err = anyhow::Error::from(CodecError::MalformedStream { offset: 2 })
            .context("Decompression failed");
        assert_eq!(exit_code(&err), 5);
        assert!(format!("{err:#}").contains("run header at offset 2"));
    }

    #[test]
    fn test_output_settings_override_config() {
        let mut config = Config::default();
        config.output.format = OutputFormat::Hex;

        let args = OutputArgs {
            format: None,
            separator: Some(" ".to_string()),
        };
        assert_eq!(
            output_settings(&args, &config),
            (OutputFormat::Hex, " ".to_string())
        );

        let args = OutputArgs {
            format: Some(OutputFormat::Decimal),
            separator: None,
        };
        assert_eq!(
            output_settings(&args, &config),
            (OutputFormat::Decimal, ",".to_string())
        );
    }

    fn no_overrides() -> OutputArgs {
        OutputArgs {
            format: None,
            separator: None,
        }
    }

    #[test]
    fn test_compress_text_renders_decimal() {
        let out = compress_text("1,2,2,2,3\n", &no_overrides(), false, &Config::default()).unwrap();
        assert_eq!(out.body, "1,130,3,3");
        assert!(out.stats.is_none());
    }

    #[test]
    fn test_compress_text_config_format() {
        let mut config = Config::default();
        config.output.format = OutputFormat::Hex;
        config.output.separator = " ".to_string();

        let out = compress_text("10 10 10", &no_overrides(), false, &config).unwrap();
        assert_eq!(out.body, "0x8A 0x03");
    }

    #[test]
    fn test_compress_text_out_of_range_literal() {
        let err = compress_text("10,200", &no_overrides(), false, &Config::default()).unwrap_err();
        assert_eq!(exit_code(&err), 4);
    }

    #[test]
    fn test_compress_text_bad_number() {
        let err = compress_text("10,x", &no_overrides(), false, &Config::default()).unwrap_err();
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn test_compress_text_stats() {
        let out =
            compress_text("10,10,10,10,20", &no_overrides(), true, &Config::default()).unwrap();
        let stats = out.stats.unwrap();
        assert_eq!(stats.original_len, 5);
        assert_eq!(stats.compressed_len, 3);
        assert_eq!(stats.run_tokens, 1);
        assert_eq!(stats.literal_tokens, 1);
        assert_eq!(stats.longest_run, 4);
    }

    #[test]
    fn test_decompress_text_exact_capacity() {
        let config = Config::default();
        let out =
            decompress_text("1,130,3,3", None, false, &no_overrides(), false, &config).unwrap();
        assert_eq!(out.body, "1,2,2,2,3");
    }

    #[test]
    fn test_decompress_text_capacity_too_small() {
        let config = Config::default();
        let err =
            decompress_text("138,10", Some(4), false, &no_overrides(), false, &config).unwrap_err();
        assert_eq!(exit_code(&err), 6);
    }

    #[test]
    fn test_decompress_text_huge_capacity() {
        let out = decompress_text(
            "138,3",
            Some(usize::MAX),
            false,
            &no_overrides(),
            false,
            &Config::default(),
        )
        .unwrap();
        assert_eq!(out.body, "10,10,10");
    }

    #[test]
    fn test_decompress_text_short_run_policy() {
        let strict = Config::default();
        let err =
            decompress_text("129,1,5", None, false, &no_overrides(), false, &strict).unwrap_err();
        assert_eq!(exit_code(&err), 5);

        let out = decompress_text("129,1,5", None, true, &no_overrides(), false, &strict).unwrap();
        assert_eq!(out.body, "1,5");

        let mut config = Config::default();
        config.decode.lenient = true;
        let out = decompress_text("129,1,5", None, false, &no_overrides(), true, &config).unwrap();
        assert_eq!(out.body, "1,5");
        assert_eq!(out.stats.unwrap().original_len, 2);
    }

    #[test]
    fn test_decompress_text_truncated() {
        let config = Config::default();
        let err =
            decompress_text("1,138", None, false, &no_overrides(), false, &config).unwrap_err();
        assert_eq!(exit_code(&err), 5);
    }

    #[test]
    fn test_verify_command_continues_past_bad_file() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("a_bad.csv"), "1,300,2").unwrap();
        std::fs::write(dir.path().join("b_good.csv"), "1,1,1,2").unwrap();

        let mut out = Vec::new();
        let err = verify_command(&[dir.path().to_path_buf()], &Config::default(), &mut out)
            .unwrap_err();
        assert_eq!(exit_code(&err), 7);
        let failure = err.downcast_ref::<VerificationFailed>().unwrap();
        assert_eq!((failure.failed, failure.total), (1, 2));

        let report = String::from_utf8(out).unwrap();
        assert!(report.contains("300 is outside 0 - 255"), "{report}");
        let good = report.lines().find(|l| l.contains("b_good.csv")).unwrap();
        assert!(good.contains("PASSED"), "{good}");
        assert!(report.contains("Total: 2 | Passed: 1 | Failed: 1"), "{report}");
    }

    #[test]
    fn test_verify_command_all_pass() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("runs.csv"), "5,5,5,5").unwrap();

        let mut out = Vec::new();
        verify_command(&[dir.path().to_path_buf()], &Config::default(), &mut out).unwrap();
        let report = String::from_utf8(out).unwrap();
        assert!(report.contains("PASSED  50.00%"), "{report}");
        assert!(report.contains("Total: 1 | Passed: 1 | Failed: 0"));
    }

    #[test]
    fn test_read_input_missing_file() {
        assert!(read_input(Some(Path::new("/nonexistent/input.csv"))).is_err());
    }

    #[test]
    fn test_cli_verify_app() {
        // clap's debug_assert verifies the command structure is valid
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
