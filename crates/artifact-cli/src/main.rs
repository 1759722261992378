use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use artifact_core::classifier::CONSTRUCTOR_NAME;
use artifact_core::deploy_output::parse_deploy_output;
use artifact_core::dummy::dummy_with_mode;
use artifact_core::size::{size_breakdown, size_with_mode, zeroed_input_hex};
use artifact_core::{
    artifact_hash, classify, normalize_artifact, CanonicalArtifact, FunctionType,
    NormalizerConfig, RawArtifact, TracingSink, TypeDescriptor, TypeMode,
};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use tracing::Level;

mod config;

/// Contract artifact toolkit
///
/// Normalize compiler artifacts, classify functions, and size or fill
/// parameter types.
#[derive(Parser)]
#[command(name = "artifact-cli", version, about, long_about = None)]
struct Cli {
    /// Only print command results, no status lines
    #[arg(long, global = true)]
    quiet: bool,

    /// Log normalization decisions (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML normalizer config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize an artifact to canonical form
    Normalize {
        /// Path to artifact JSON
        file: PathBuf,
        /// Write the canonical artifact here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show how each function is classified
    Classify {
        /// Path to artifact JSON
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute the word size of a parameter type
    Size {
        /// Path to artifact JSON
        file: PathBuf,
        #[arg(long, default_value = CONSTRUCTOR_NAME)]
        function: String,
        #[arg(long, default_value = "inputs")]
        param: String,
        /// Fail on unknown type kinds
        #[arg(long)]
        strict: bool,
        /// Print the size of every leaf path
        #[arg(long)]
        breakdown: bool,
    },

    /// Generate a placeholder value for a parameter type
    Dummy {
        /// Path to artifact JSON
        file: PathBuf,
        #[arg(long, default_value = CONSTRUCTOR_NAME)]
        function: String,
        #[arg(long, default_value = "inputs")]
        param: String,
        /// Fail on unknown type kinds
        #[arg(long)]
        strict: bool,
    },

    /// Compute the SHA-256 hash of the canonical artifact
    Hash {
        /// Path to artifact JSON
        file: PathBuf,
    },

    /// Extract address and alias from deploy tool output (`-` for stdin)
    DeployOutput {
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

/// CLI failure, split by exit code
#[derive(Debug)]
pub enum CliError {
    /// Input was read but did not satisfy the request (exit 1)
    Validation(String),
    /// Input could not be read, parsed, or configured (exit 2)
    Fatal(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation(_) => 1,
            CliError::Fatal(_) => 2,
        }
    }

    fn message(&self) -> &str {
        match self {
            CliError::Validation(msg) | CliError::Fatal(msg) => msg,
        }
    }
}

impl From<artifact_core::Error> for CliError {
    fn from(e: artifact_core::Error) -> Self {
        use artifact_core::Error;
        match e {
            Error::UnknownTypeKind { .. }
            | Error::FunctionNotFound { .. }
            | Error::ParameterNotFound { .. }
            | Error::BlobTooLarge { .. }
            | Error::OutputFormat(_) => CliError::Validation(e.to_string()),
            Error::Parse(_) | Error::MissingField { .. } | Error::Config(_) => {
                CliError::Fatal(e.to_string())
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e.message());
            e.exit_code()
        }
    };

    process::exit(exit_code);
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = config::load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Normalize { file, output } => {
            let canonical = load_canonical(file, &config)?;
            let text = artifact_core::normalizer::serialize_canonical(&canonical)?;
            match output {
                Some(path) => {
                    fs::write(path, format!("{}\n", text)).map_err(|e| {
                        CliError::Fatal(format!("Failed to write {}: {}", path.display(), e))
                    })?;
                    if !cli.quiet {
                        println!(
                            "{} {} function(s) → {}",
                            "normalized".green().bold(),
                            canonical.functions.len(),
                            path.display()
                        );
                    }
                }
                None => println!("{}", text),
            }
        }

        Commands::Classify { file, json } => {
            let raw = load_raw(file)?;
            let rows: Vec<serde_json::Value> = raw
                .functions
                .iter()
                .map(|f| {
                    let c = classify(&f.name, &f.custom_attributes, f.is_unconstrained);
                    serde_json::json!({
                        "name": f.name,
                        "functionType": c.function_type,
                        "isInternal": c.modifiers.is_internal,
                        "isStatic": c.modifiers.is_static,
                        "isInitializer": c.modifiers.is_initializer,
                        "rule": c.rule,
                        "attributes": c.attributes,
                        "excluded": config.is_excluded(&f.name),
                    })
                })
                .collect();
            if *json {
                let text = serde_json::to_string_pretty(&rows).map_err(artifact_core::Error::from)?;
                println!("{}", text);
            } else {
                for f in &raw.functions {
                    let c = classify(&f.name, &f.custom_attributes, f.is_unconstrained);
                    let kind = match c.function_type {
                        FunctionType::Public => "public".green(),
                        FunctionType::Private => "private".blue(),
                        FunctionType::Utility => "utility".yellow(),
                    };
                    let mut flags = Vec::new();
                    if c.modifiers.is_internal {
                        flags.push("internal");
                    }
                    if c.modifiers.is_static {
                        flags.push("static");
                    }
                    if c.modifiers.is_initializer {
                        flags.push("initializer");
                    }
                    let excluded = if config.is_excluded(&f.name) {
                        " (excluded)".dimmed().to_string()
                    } else {
                        String::new()
                    };
                    println!(
                        "{:<32} {:<8} [{}] via {}{}",
                        f.name,
                        kind,
                        flags.join(", "),
                        c.rule,
                        excluded
                    );
                }
            }
        }

        Commands::Size {
            file,
            function,
            param,
            strict,
            breakdown,
        } => {
            let ty = load_parameter_type(file, &config, function, param)?;
            let mode = effective_mode(&config, *strict);
            let words = size_with_mode(&ty, mode)?;
            let hex = zeroed_input_hex(words)?;
            println!("Size in fields: {}", words);
            println!("Hex string: {}", hex);
            if *breakdown {
                for (path, n) in size_breakdown(&ty) {
                    println!("  {:<48} {}", path, n);
                }
            }
        }

        Commands::Dummy {
            file,
            function,
            param,
            strict,
        } => {
            let ty = load_parameter_type(file, &config, function, param)?;
            let value = dummy_with_mode(&ty, effective_mode(&config, *strict))?;
            let text = serde_json::to_string(&value).map_err(artifact_core::Error::from)?;
            println!("{}", text);
        }

        Commands::Hash { file } => {
            let canonical = load_canonical(file, &config)?;
            println!("{}", artifact_hash(&canonical)?);
        }

        Commands::DeployOutput { file, json } => {
            let text = if file.as_os_str() == "-" {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .map_err(|e| CliError::Fatal(format!("Failed to read stdin: {}", e)))?;
                buf
            } else {
                read_file(file)?
            };
            let out = parse_deploy_output(&text)?;
            if *json {
                println!(
                    "{}",
                    serde_json::json!({"address": out.address, "alias": out.alias})
                );
            } else {
                println!("address: {}", out.address);
                println!("alias: {}", out.alias);
            }
        }

        Commands::Version => {
            println!(
                "artifact-cli {} (artifact-core {})",
                env!("CARGO_PKG_VERSION"),
                artifact_core::VERSION
            );
        }
    }

    Ok(())
}

fn effective_mode(config: &NormalizerConfig, strict: bool) -> TypeMode {
    if strict {
        TypeMode::Strict
    } else {
        config.type_mode
    }
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path)
        .map_err(|e| CliError::Fatal(format!("Failed to read {}: {}", path.display(), e)))
}

fn load_raw(path: &Path) -> Result<RawArtifact, CliError> {
    let text = read_file(path)?;
    Ok(RawArtifact::from_json(&text)?)
}

fn load_canonical(path: &Path, config: &NormalizerConfig) -> Result<CanonicalArtifact, CliError> {
    let raw = load_raw(path)?;
    Ok(normalize_artifact(raw, config, &mut TracingSink))
}

fn load_parameter_type(
    path: &Path,
    config: &NormalizerConfig,
    function: &str,
    param: &str,
) -> Result<TypeDescriptor, CliError> {
    let canonical = load_canonical(path, config)?;
    let ty = canonical.function(function)?.parameter_type(param)?;
    Ok(ty)
}
