//! ReadsUtils CLI - Command-line interface for the ReadsUtils service

mod input;

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};
use colored::Colorize;
use readsutils_sdk::domain::{
    ConvertReadLibraryParams, DownloadReadsParams, ExportParams, Tern, UploadReadsOutput,
    UploadReadsParams, UploadStagingParams, UploadWebParams, ValidateFastqParams,
};
use readsutils_sdk::{ClientConfig, ReadsUtilsClient};
use serde::Serialize;
use tabled::{Table, Tabled};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "readsutils")]
#[command(about = "ReadsUtils service CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// ReadsUtils service URL
    #[arg(long, env = "READSUTILS_URL")]
    url: String,

    /// Auth token
    #[arg(long, env = "KB_AUTH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// User name (with --password; ignored when a token is given)
    #[arg(long, env = "READSUTILS_USER")]
    user: Option<String>,

    #[arg(long, env = "READSUTILS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Auth service login URL; exchanges user/password for a token
    #[arg(long, env = "READSUTILS_AUTH_URL")]
    auth_url: Option<String>,

    /// Allow credentials over plain http
    #[arg(long, env = "READSUTILS_INSECURE_HTTP", value_parser = BoolishValueParser::new())]
    insecure_http: bool,

    /// Skip server certificate validation
    #[arg(long, env = "READSUTILS_TRUST_ALL_CERTS", value_parser = BoolishValueParser::new())]
    trust_all_certs: bool,

    /// Stream request bodies instead of buffering them
    #[arg(long, env = "READSUTILS_STREAMING", value_parser = BoolishValueParser::new())]
    streaming: bool,

    /// Read timeout in milliseconds (0 = none)
    #[arg(long, env = "READSUTILS_READ_TIMEOUT_MS")]
    read_timeout_ms: Option<u64>,

    /// Pin the service version (e.g. dev, beta, release, or a git hash)
    #[arg(long, env = "READSUTILS_SERVICE_VER")]
    service_ver: Option<String>,

    /// Print raw JSON results
    #[arg(long)]
    json: bool,

    /// Send parameters without local pre-flight checks
    #[arg(long)]
    no_validate: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show service status
    Status,

    /// Check that files are FASTQ files
    ValidateFastq {
        /// File path on the service host (repeatable)
        #[arg(long = "file", required = true)]
        files: Vec<String>,

        /// Files are interleaved
        #[arg(long)]
        interleaved: bool,
    },

    /// Upload reads from shock nodes or service-local files
    Upload {
        /// JSON params or @file
        #[arg(long)]
        params: String,
    },

    /// Upload reads from the staging area
    UploadStaging {
        #[arg(long)]
        params: String,
    },

    /// Upload reads from a web URL
    UploadWeb {
        #[arg(long)]
        params: String,
    },

    /// Download read libraries
    Download {
        #[arg(long)]
        params: Option<String>,

        /// Read library reference (repeatable)
        #[arg(long = "lib")]
        libs: Vec<String>,

        /// true: interleave, false: deinterleave
        #[arg(long)]
        interleaved: Option<Tern>,
    },

    /// Export a read library to shock
    Export {
        #[arg(long)]
        params: Option<String>,

        #[arg(long)]
        input_ref: Option<String>,
    },

    /// Convert read libraries to files
    Convert {
        #[arg(long)]
        params: Option<String>,

        /// Read library reference (repeatable)
        #[arg(long = "lib")]
        libs: Vec<String>,

        #[arg(long)]
        interleaved: Option<Tern>,

        #[arg(long)]
        gzip: Option<Tern>,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Status => "status",
            Commands::ValidateFastq { .. } => "validate-fastq",
            Commands::Upload { .. } => "upload",
            Commands::UploadStaging { .. } => "upload-staging",
            Commands::UploadWeb { .. } => "upload-web",
            Commands::Download { .. } => "download",
            Commands::Export { .. } => "export",
            Commands::Convert { .. } => "convert",
        }
    }
}

#[derive(Tabled)]
struct LibraryRow {
    #[tabled(rename = "Reference")]
    reference: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Forward")]
    fwd: String,
    #[tabled(rename = "Reverse")]
    rev: String,
}

fn init_logging() {
    let log_format = std::env::var("READSUTILS_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("readsutils=info"));

    // Logs go to stderr so --json output stays parseable
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

async fn build_client(cli: &Cli) -> Result<ReadsUtilsClient> {
    let mut config = ClientConfig::new(&cli.url)?;

    if let Some(token) = &cli.token {
        config = config.with_token(token);
    } else if let (Some(user), Some(password)) = (&cli.user, &cli.password) {
        config = config.with_basic_auth(user, password);
    }
    if let Some(auth_url) = &cli.auth_url {
        config = config.with_auth_url(auth_url)?;
    }

    config.set_insecure_http_allowed(cli.insecure_http);
    config.set_all_certs_trusted(cli.trust_all_certs);
    config.set_streaming_mode(cli.streaming);
    config.set_read_timeout(cli.read_timeout_ms);
    config.set_service_version(cli.service_ver.clone());

    if cli.token.is_none() && config.auth_url().is_some() {
        tracing::info!(auth_url = ?cli.auth_url, "Logging in");
    }
    tracing::debug!(
        url = %cli.url,
        streaming = cli.streaming,
        read_timeout_ms = ?cli.read_timeout_ms,
        "Client configured"
    );

    ReadsUtilsClient::connect(config)
        .await
        .context("Failed to log in")
}

/// One record per file; an absent `--interleaved` stays unset
fn fastq_params(files: &[String], interleaved: bool) -> Vec<ValidateFastqParams> {
    files
        .iter()
        .map(|path| ValidateFastqParams {
            interleaved: interleaved.then_some(true),
            ..ValidateFastqParams::new(path.as_str())
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_uploaded(out: &UploadReadsOutput) {
    println!("{}", "✓ Reads uploaded".green().bold());
    println!(
        "  {} {}",
        "Object:".bold(),
        out.obj_ref.as_deref().unwrap_or("-")
    );
}

fn print_libraries(rows: Vec<LibraryRow>) {
    if rows.is_empty() {
        println!("{}", "No read libraries returned".yellow());
        return;
    }
    println!("{}", Table::new(rows));
}

fn dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let client = build_client(&cli).await?;
    let validate = !cli.no_validate;
    tracing::debug!(command = cli.command.name(), validate, "Running command");

    match &cli.command {
        Commands::Status => {
            match client.status(None).await {
                Ok(status) if cli.json => print_json(&status)?,
                Ok(status) => {
                    println!("{}", "ReadsUtils Status".cyan().bold());
                    println!();
                    let state = status.state.as_deref().unwrap_or("UNKNOWN");
                    let state = if status.is_ok() {
                        state.green()
                    } else {
                        state.red()
                    };
                    println!("  {} {}", "URL:".bold(), cli.url);
                    println!("  {} {}", "State:".bold(), state);
                    println!("  {} {}", "Version:".bold(), dash(status.version.as_deref()));
                    println!("  {} {}", "Git URL:".bold(), dash(status.git_url.as_deref()));
                    println!(
                        "  {} {}",
                        "Commit:".bold(),
                        dash(status.git_commit_hash.as_deref())
                    );
                    if let Some(message) = &status.message {
                        println!("  {} {}", "Message:".bold(), message);
                    }
                }
                Err(e) => {
                    println!("  {} {}", "State:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }

        Commands::ValidateFastq { files, interleaved } => {
            let params = fastq_params(files, *interleaved);

            let out = client.validate_fastq(&params, None).await?;
            if cli.json {
                return print_json(&out);
            }
            for (path, result) in files.iter().zip(&out) {
                if result.is_valid() {
                    println!("  {} {}", "✓".green(), path);
                } else {
                    println!("  {} {}", "✗".red(), path);
                }
            }
        }

        Commands::Upload { params } => {
            let params: UploadReadsParams = input::load(params)?;
            if validate {
                params.validate()?;
            }
            let out = client.upload_reads(&params, None).await?;
            if cli.json {
                return print_json(&out);
            }
            print_uploaded(&out);
        }

        Commands::UploadStaging { params } => {
            let params: UploadStagingParams = input::load(params)?;
            if validate {
                params.validate()?;
            }
            let out = client.upload_reads_from_staging_area(&params, None).await?;
            if cli.json {
                return print_json(&out);
            }
            print_uploaded(&out);
        }

        Commands::UploadWeb { params } => {
            let params: UploadWebParams = input::load(params)?;
            if validate {
                params.validate()?;
            }
            let out = client.upload_reads_from_web(&params, None).await?;
            if cli.json {
                return print_json(&out);
            }
            print_uploaded(&out);
        }

        Commands::Download {
            params,
            libs,
            interleaved,
        } => {
            let mut params: DownloadReadsParams = input::load_or_default(params.as_deref())?;
            if !libs.is_empty() {
                params.read_libraries = Some(libs.clone());
            }
            if interleaved.is_some() {
                params.interleaved = *interleaved;
            }
            if validate {
                params.validate()?;
            }

            let out = client.download_reads(&params, None).await?;
            if cli.json {
                return print_json(&out);
            }
            let rows = out
                .files
                .unwrap_or_default()
                .into_iter()
                .map(|(reference, lib)| {
                    let files = lib.files.unwrap_or_default();
                    LibraryRow {
                        reference,
                        kind: dash(files.type_.as_deref()),
                        fwd: dash(files.fwd.as_deref()),
                        rev: dash(files.rev.as_deref()),
                    }
                })
                .collect();
            print_libraries(rows);
        }

        Commands::Export { params, input_ref } => {
            let mut params: ExportParams = input::load_or_default(params.as_deref())?;
            if input_ref.is_some() {
                params.input_ref = input_ref.clone();
            }
            if validate {
                params.validate()?;
            }

            let out = client.export_reads(&params, None).await?;
            if cli.json {
                return print_json(&out);
            }
            println!("{}", "✓ Reads exported".green().bold());
            println!("  {} {}", "Shock node:".bold(), dash(out.shock_id.as_deref()));
        }

        Commands::Convert {
            params,
            libs,
            interleaved,
            gzip,
        } => {
            let mut params: ConvertReadLibraryParams =
                input::load_or_default(params.as_deref())?;
            if !libs.is_empty() {
                params.read_libraries = Some(libs.clone());
            }
            if interleaved.is_some() {
                params.interleaved = *interleaved;
            }
            if gzip.is_some() {
                params.gzip = *gzip;
            }
            if validate {
                params.validate()?;
            }

            let out = client.convert_read_library_to_file(&params, None).await?;
            if cli.json {
                return print_json(&out);
            }
            let rows = out
                .files
                .unwrap_or_default()
                .into_iter()
                .map(|(reference, lib)| LibraryRow {
                    reference,
                    kind: dash(lib.type_.as_deref()),
                    fwd: dash(lib.fwd.as_deref()),
                    rev: dash(lib.rev.as_deref()),
                })
                .collect();
            print_libraries(rows);
        }
    }

    Ok(())
}
