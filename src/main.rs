//! jukebox-verify - Phoniebox post-installation checks.
//!
//! Asserts that an installer run produced the expected system state:
//! config file contents, ownership and permissions, OS packages, Python
//! modules and systemd units. Exits 1 if anything is off.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use jukebox_verify::inspect::Platform;

#[derive(Parser)]
#[command(name = "jukebox-verify")]
#[command(about = "Verify a Phoniebox jukebox installation")]
#[command(
    after_help = "EXAMPLES:\n  jukebox-verify             Verify after a successful install\n  jukebox-verify \"$?\"        Pass on the installer's exit code\n  jukebox-verify --json      Also print the summary as JSON"
)]
struct Cli {
    /// Exit code of the installer run being verified (2 = prerequisites failed)
    #[arg(default_value_t = 0, allow_negative_numbers = true)]
    install_exit_code: i32,

    /// Home directory of the jukebox account
    #[arg(long, env = "JUKEBOX_HOME")]
    home: Option<PathBuf>,

    /// Account the jukebox was installed for
    #[arg(long, env = "JUKEBOX_USER")]
    user: Option<String>,

    /// Installation directory (default: <home>/RPi-Jukebox-RFID)
    #[arg(long, env = "JUKEBOX_DIR")]
    jukebox_dir: Option<PathBuf>,

    /// Hardware platform; board-only packages are checked on raspberry-pi
    #[arg(long, env = "JUKEBOX_PLATFORM", value_enum, default_value_t = PlatformArg::Auto)]
    platform: PlatformArg,

    /// Print the final summary as a JSON line
    #[arg(long)]
    json: bool,

    /// Log inspector commands and gate decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PlatformArg {
    /// Detect from `uname -m`
    Auto,
    RaspberryPi,
    Generic,
}

impl PlatformArg {
    fn platform(self) -> Option<Platform> {
        match self {
            PlatformArg::Auto => None,
            PlatformArg::RaspberryPi => Some(Platform::RaspberryPi),
            PlatformArg::Generic => Some(Platform::Generic),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // Load .env before parsing so it can supply JUKEBOX_* defaults
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = commands::cmd_verify(commands::VerifyArgs {
        install_exit_code: cli.install_exit_code,
        home: cli.home,
        user: cli.user,
        jukebox_dir: cli.jukebox_dir,
        platform: cli.platform.platform(),
        json: cli.json,
    })?;

    std::process::exit(code);
}
