#![deny(missing_docs)]
//! A command-line interface for generating OATH one-time passwords.

use clap::{Args, Parser, Subcommand};
use config::CliConfig;
use log::{error, info};
use oath_core::hotp::{self, Digits};
use oath_core::sha1::sha1_reader;
use oath_core::totp::TotpParams;
use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

mod config;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "EXAMPLES:\n  \n# Current TOTP code for a text secret\noath-cli totp --secret 12345678901234567890\n\n# TOTP code at a fixed time with 8 digits\noath-cli totp --secret-hex 3132333435363738393031323334353637383930 --time 59 --digits 8\n\n# HOTP code for counter 5\noath-cli hotp --secret 12345678901234567890 --counter 5\n\n# Store default TOTP parameters and use them\noath-cli --config ./oath.json config init\noath-cli --config ./oath.json totp --secret 12345678901234567890\n\n# SHA-1 digest of a file\noath-cli digest ./my_file.txt"
)]
struct Cli {
    /// Path to a JSON file with default parameters.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Where the shared secret comes from. Exactly one source is required.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct SecretArgs {
    /// The shared secret, used as the raw bytes of the given text
    #[arg(long, value_name = "TEXT")]
    secret: Option<String>,

    /// The shared secret, hex encoded
    #[arg(long, value_name = "HEX")]
    secret_hex: Option<String>,
}

impl SecretArgs {
    fn to_bytes(&self) -> Result<Vec<u8>, String> {
        match (&self.secret, &self.secret_hex) {
            (Some(text), _) => Ok(text.as_bytes().to_vec()),
            (None, Some(encoded)) => {
                hex::decode(encoded).map_err(|e| format!("invalid hex secret: {e}"))
            }
            (None, None) => Err("a secret is required".to_string()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a time-based one-time password (RFC 6238)
    Totp {
        #[command(flatten)]
        secret: SecretArgs,

        /// Unix time to generate the code for. Defaults to the current time.
        #[arg(long, allow_negative_numbers = true)]
        time: Option<i64>,

        /// Time step in seconds. 0 selects the default of 30.
        #[arg(long)]
        step: Option<u32>,

        /// Unix time at which step counting starts.
        #[arg(long, allow_negative_numbers = true)]
        start_offset: Option<i64>,

        /// Number of digits (6, 7 or 8).
        #[arg(short, long)]
        digits: Option<u8>,

        /// Also print the interval in which the code is valid.
        #[arg(long)]
        show_window: bool,
    },
    /// Generate a counter-based one-time password (RFC 4226)
    Hotp {
        #[command(flatten)]
        secret: SecretArgs,

        /// The moving factor.
        #[arg(short, long)]
        counter: u64,

        /// Number of digits (6, 7 or 8).
        #[arg(short, long)]
        digits: Option<u8>,
    },
    /// Print the SHA-1 digest of a file, or of standard input
    Digest {
        /// Path to the input file. Reads standard input if omitted.
        #[arg()]
        input: Option<PathBuf>,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a configuration file with default parameters
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Show the effective configuration
    Show,
}

/// Logs `context` with the error and terminates with exit status 1.
fn or_exit<T, E: Display>(result: Result<T, E>, context: &str) -> T {
    result.unwrap_or_else(|e| {
        error!("{context}: {e}");
        std::process::exit(1);
    })
}

fn current_unix_time() -> Result<i64, String> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| e.to_string())?;
    i64::try_from(elapsed.as_secs()).map_err(|e| e.to_string())
}

fn resolve_digits(requested: Option<u8>, fallback: Digits) -> Digits {
    requested.map_or(fallback, |d| {
        or_exit(Digits::try_from(d), "Invalid --digits value")
    })
}

fn require_config_path(path: Option<&PathBuf>) -> &Path {
    path.map_or_else(
        || {
            error!("A --config path is required for this command.");
            std::process::exit(1);
        },
        PathBuf::as_path,
    )
}

/// Reads the `--config` file, or defaults when no path was given.
fn effective_config(path: Option<&Path>) -> CliConfig {
    path.map_or_else(CliConfig::default, |path| {
        or_exit(config::load_config(path), "Failed to load configuration")
    })
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Totp {
            secret,
            time,
            step,
            start_offset,
            digits,
            show_window,
        } => {
            let config = effective_config(cli.config.as_deref());
            let secret = or_exit(secret.to_bytes(), "Failed to read secret");
            let params = TotpParams {
                step: step.unwrap_or(config.totp.step),
                start_offset: start_offset.unwrap_or(config.totp.start_offset),
                digits: resolve_digits(*digits, config.totp.digits),
            };
            let now = time
                .unwrap_or_else(|| or_exit(current_unix_time(), "Failed to read the system clock"));

            info!(
                "Generating a {}-digit TOTP for time {now} (step {}s, start offset {}).",
                params.digits.as_u8(),
                params.step,
                params.start_offset
            );
            let otp = or_exit(params.generate(&secret, now), "Failed to generate TOTP");
            println!("{otp}");

            if *show_window {
                let window = or_exit(params.window(now), "Failed to compute validity window");
                println!("Valid from {} until {}", window.start, window.end);
            }
        }
        Commands::Hotp {
            secret,
            counter,
            digits,
        } => {
            let config = effective_config(cli.config.as_deref());
            let secret = or_exit(secret.to_bytes(), "Failed to read secret");
            let digits = resolve_digits(*digits, config.hotp_digits);

            info!(
                "Generating a {}-digit HOTP for counter {counter}.",
                digits.as_u8()
            );
            println!("{}", hotp::derive(&secret, *counter, digits));
        }
        Commands::Digest { input } => {
            let (digest, name) = match input {
                Some(path) => {
                    let file = or_exit(fs::File::open(path), "Failed to open input file");
                    info!("Hashing '{}'.", path.display());
                    (sha1_reader(file), path.display().to_string())
                }
                None => (sha1_reader(io::stdin().lock()), "-".to_string()),
            };
            let digest = or_exit(digest, "Failed to hash input");
            println!("{digest}  {name}");
        }
        Commands::Config { command } => {
            let path = require_config_path(cli.config.as_ref());
            match command {
                ConfigCommands::Init { force } => {
                    if path.exists() && !force {
                        error!(
                            "Configuration file '{}' already exists. Use --force to overwrite it.",
                            path.display()
                        );
                        std::process::exit(1);
                    }
                    or_exit(
                        config::save_config(path, &CliConfig::default()),
                        "Failed to write configuration",
                    );
                    info!("Configuration written to '{}'.", path.display());
                }
                ConfigCommands::Show => {
                    let config = effective_config(Some(path));
                    let rendered = or_exit(
                        serde_json::to_string_pretty(&config),
                        "Failed to render configuration",
                    );
                    println!("{rendered}");
                }
            }
        }
    }
}
