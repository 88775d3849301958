mod demo;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

use trackview::core::config::{self, CliOverrides, TrackviewConfig};
use trackview::{Exit, Table};

const ACCESSIBILITY_HELP: &str = "
Trackview Accessibility Features
================================

Trackview can narrate the table for screen readers.

Usage:
  trackview --accessibility         Enable accessibility features
  trackview --accessibility-help    Display this help message

When accessibility mode is enabled:
- Every selection change is announced
- Opening help, copying, and the transition menu are announced
- Additional key commands are available

Keyboard shortcuts in accessibility mode:
- Ctrl+S: Speak the current cell
- Ctrl+A: Hear the accessibility help message
- Arrow keys: Navigate between items
- Tab: Move between buttons in the transition menu
- Enter: Select the current item

Announcements are written to stderr (or the file set in config.toml) as
lines starting with [SCREEN_READER_ANNOUNCEMENT].

To enable accessibility mode permanently, set the environment variable:
  export TRACKVIEW_ACCESSIBILITY_MODE=1
";

#[derive(Parser)]
#[command(name = "trackview", about = "Browse issues in an accessible terminal table")]
struct Args {
    /// JSON file with an array of issues (defaults to a built-in sample)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Narrate the table for screen readers
    #[arg(short, long)]
    accessibility: bool,

    /// Describe the accessibility features and exit
    #[arg(long)]
    accessibility_help: bool,

    /// Pager for the detail view (e.g. "less -r")
    #[arg(long)]
    pager: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    if args.accessibility_help {
        println!("{ACCESSIBILITY_HELP}");
        return Ok(());
    }
    dotenv::dotenv().ok();

    // Initialize file logger - writes to trackview.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("trackview.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("Ignoring config file: {e}");
        log::warn!("Ignoring config file: {}", e);
        TrackviewConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            accessibility: args.accessibility,
            pager: args.pager.clone(),
        },
    );
    log::info!(
        "Trackview starting up (accessibility: {}, pager: {})",
        resolved.accessibility,
        resolved.pager
    );

    let issues = match &args.input {
        Some(path) => demo::load_issues(path)?,
        None => demo::sample_issues(),
    };
    let store = demo::Store::new(issues);
    let mut table = Table::new(resolved).with_hooks(demo::hooks(&store));

    loop {
        let data = store.table();
        let footer = format!(
            "Showing {} issues. Press ? for help, m to transition, v to view.",
            data.data_row_count()
        );
        table = table.with_footer(footer);

        match table.paint(data)? {
            Exit::Quit => break,
            Exit::Refresh => {
                if let Some(path) = &args.input {
                    match demo::load_issues(path) {
                        Ok(issues) => store.replace(issues),
                        Err(e) => log::warn!("Reload failed, keeping current issues: {}", e),
                    }
                }
            }
        }
    }

    log::info!("Trackview exiting");
    Ok(())
}
