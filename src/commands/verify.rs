//! Verify command - checks the system state an installer run left behind.

use std::path::PathBuf;

use anyhow::{Context, Result};

use jukebox_verify::check::Report;
use jukebox_verify::config::Layout;
use jukebox_verify::inspect::{HostInspector, Platform};
use jukebox_verify::verify::{self, RunOptions};

/// Arguments of the verify command.
pub struct VerifyArgs {
    pub install_exit_code: i32,
    pub home: Option<PathBuf>,
    pub user: Option<String>,
    pub jukebox_dir: Option<PathBuf>,
    /// `None` detects the platform from the host.
    pub platform: Option<Platform>,
    pub json: bool,
}

/// Execute the verify command. Returns the process exit status.
pub fn cmd_verify(args: VerifyArgs) -> Result<i32> {
    let layout = Layout::resolve(args.home, args.user, args.jukebox_dir)
        .context("Cannot resolve the jukebox installation layout")?;
    let platform = args.platform.unwrap_or_else(HostInspector::detect_platform);

    tracing::debug!(
        home = %layout.home.display(),
        user = %layout.user,
        jukebox_dir = %layout.jukebox_dir.display(),
        %platform,
        "verifying installation"
    );

    let inspector = HostInspector::detect();
    let options = RunOptions {
        layout,
        platform,
        install_exit_code: args.install_exit_code,
    };

    let mut report = Report::stdout();
    let outcome = verify::run(&options, &inspector, &mut report);

    if args.json {
        if let Some(summary) = outcome.summary() {
            let json = serde_json::to_string(&summary).context("Failed to serialize summary")?;
            println!("{}", json);
        }
    }

    Ok(outcome.exit_code())
}
