mod logging;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use linkmap_core::{MapConfig, RangeStatus, check_layout, format_hex, parse_hex, validate_range};
use linkmap_extract::output::{OutputFormat, format_bundle, format_checks, format_layout};
use linkmap_extract::report::ReportBundle;
use linkmap_extract::tables::LayoutTables;
use linkmap_extract::{detect_format, extract_layout_from_path, read_map_file};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "linkmap")]
#[command(version, about = "Linker map memory layout extraction and range checks")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report the dialect of a map file.
    Detect(DetectArgs),
    /// Extract region, sub-section and hierarchy tables from a map file.
    Extract(ExtractArgs),
    /// Check every region and sub-section range of a map file.
    Check(CheckArgs),
    /// Validate a single address range.
    Validate(ValidateArgs),
    /// Write the default configuration as YAML.
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct DetectArgs {
    /// Path to the linker map file.
    #[arg(long)]
    input: PathBuf,
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Path to the linker map file.
    #[arg(long)]
    input: PathBuf,
    /// YAML configuration overriding naming and hierarchy rules.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Write output to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output both layout tables and extraction report.
    #[arg(long)]
    with_report: bool,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Path to the linker map file.
    #[arg(long)]
    input: PathBuf,
    /// YAML configuration overriding naming and hierarchy rules.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Alignment boundary in hex (overrides the configured alignment).
    #[arg(long, value_parser = parse_hex_arg)]
    alignment: Option<u64>,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: OutputFormat,
    /// Exit with status 1 when any verdict fails.
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Range start as a hex literal.
    #[arg(long)]
    start: Option<String>,
    /// Range end as a hex literal.
    #[arg(long)]
    end: Option<String>,
    /// Alignment boundary in hex.
    #[arg(long, value_parser = parse_hex_arg, default_value = "0x40")]
    alignment: u64,
    /// Print the verdict as JSON instead of plain text.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct ConfigArgs {
    /// Destination YAML file; prints to stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Detect(args) => run_detect(args),
        Command::Extract(args) => run_extract(args),
        Command::Check(args) => run_check(args),
        Command::Validate(args) => run_validate(args),
        Command::Config(args) => run_config(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn parse_hex_arg(value: &str) -> Result<u64, String> {
    parse_hex(value).ok_or_else(|| format!("'{value}' is not a hex literal"))
}

fn load_config(path: Option<&Path>) -> Result<MapConfig, String> {
    linkmap_extract::load_config(path).map_err(|err| match path {
        Some(path) => format!("Failed to load config '{}': {err}", path.display()),
        None => err.to_string(),
    })
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), String> {
    let mut content = content.to_string();
    if !content.ends_with('\n') {
        content.push('\n');
    }

    match output {
        Some(path) => {
            fs::write(path, content)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            info!(path = %path.display(), "Wrote output");
        }
        None => print!("{content}"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// detect command
// ---------------------------------------------------------------------------

fn run_detect(args: DetectArgs) -> Result<(), String> {
    let text = read_map_file(&args.input).map_err(|err| err.to_string())?;
    let format = detect_format(&text);
    println!("{format}");

    if !format.is_recognized() {
        return Err(format!(
            "no tabular symbol rows in '{}'",
            args.input.display()
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// extract command
// ---------------------------------------------------------------------------

fn run_extract(args: ExtractArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let run = extract_layout_from_path(&args.input, &config).map_err(|err| err.to_string())?;

    for warning in &run.report.warnings {
        warn!(input = %run.report.input, "{warning}");
    }

    let tables = LayoutTables::from_layout(&run.layout, &config.naming.reset_safe_marker);
    let content = if args.with_report {
        let generated_at = chrono::Utc::now().to_rfc3339();
        let bundle = ReportBundle::new(tables, run.report, generated_at);
        format_bundle(&bundle, args.format)?
    } else {
        format_layout(&tables, args.format)?
    };

    write_output(args.output.as_deref(), &content)
}

// ---------------------------------------------------------------------------
// check command
// ---------------------------------------------------------------------------

fn run_check(args: CheckArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let alignment = args.alignment.unwrap_or(config.alignment);
    let run = extract_layout_from_path(&args.input, &config).map_err(|err| err.to_string())?;

    let checks = check_layout(&run.layout, alignment);
    let failed = checks.iter().filter(|check| !check.passed()).count();
    info!(
        checks = checks.len(),
        failed,
        alignment = %format_hex(alignment.into()),
        "Checked layout ranges"
    );

    write_output(None, &format_checks(&checks, args.format)?)?;

    if args.strict && failed > 0 {
        return Err(format!("{failed} of {} range checks failed", checks.len()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// validate command
// ---------------------------------------------------------------------------

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let status = validate_range(args.start.as_deref(), args.end.as_deref(), args.alignment);

    if args.json {
        #[derive(serde::Serialize)]
        struct ValidateOutput<'a> {
            start: Option<&'a str>,
            end: Option<&'a str>,
            alignment: String,
            status: RangeStatus,
            verdict: String,
        }

        let output = ValidateOutput {
            start: args.start.as_deref(),
            end: args.end.as_deref(),
            alignment: format_hex(args.alignment.into()),
            status,
            verdict: status.to_string(),
        };
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| format!("Failed to serialize output: {e}"))?;
        println!("{json}");
    } else {
        println!("{status}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// config command
// ---------------------------------------------------------------------------

fn run_config(args: ConfigArgs) -> Result<(), String> {
    let config = MapConfig::default();
    match args.output {
        Some(path) => {
            config
                .save(&path)
                .map_err(|err| format!("Failed to write config '{}': {err}", path.display()))?;
            eprintln!("Wrote default configuration to {}", path.display());
        }
        None => {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| format!("Failed to serialize config: {e}"))?;
            print!("{yaml}");
        }
    }
    Ok(())
}
