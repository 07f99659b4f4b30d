//! Freezer Monitor: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  PiContactSwitch   CsvDirectory   SmtpNotifier  LogEventSink │
//! │  (SignalPort)      (Directory)    (Notifier)    (EventSink)  │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ─────────────────────   │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │           MonitorService (pure logic)              │      │
//! │  │  edge detection · lookup · fallback routing        │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Startup failures that leave the freezer unwatched are reported to the
//! fallback contact (best effort) and end the process with a non-zero
//! status so the service manager restarts it.
#![deny(unused_must_use)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

use freezer_monitor::adapters::csv_directory::CsvDirectory;
use freezer_monitor::adapters::log_sink::LogEventSink;
use freezer_monitor::adapters::smtp::SmtpNotifier;
use freezer_monitor::adapters::{device_id, gpio};
use freezer_monitor::app::ports::DirectoryPort;
use freezer_monitor::app::service::MonitorService;
use freezer_monitor::app::startup::{self, Mode};
use freezer_monitor::error::Error;

/// Watch a freezer's remote-alarm contact and mail its owners on every change.
#[derive(Debug, Parser)]
#[command(name = "freezer-monitor", version)]
struct Cli {
    /// JSON configuration file; absent fields keep their defaults.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Look up this monitor in the contact directory, print the record and exit.
    #[arg(long)]
    check_directory: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    info!("╔══════════════════════════════════════╗");
    info!("║  Freezer Monitor v{}               ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    match start(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!("Fatal: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn start(cli: &Cli) -> Result<ExitCode> {
    let config = startup::load_config(cli.config.as_deref())?;
    let mut notifier = SmtpNotifier::new(&config.smtp)
        .map_err(Error::from)
        .context("mail transport")?;
    let directory = CsvDirectory::new(&config.directory_path);

    if cli.check_directory {
        let address =
            startup::resolve_address(Mode::Check, &config, &mut notifier, device_id::resolve)?;
        let record = startup::check_directory(&directory, &address)
            .with_context(|| format!("{}", directory.path().display()))?;
        println!("address:  {}", record.address);
        println!("location: {}", record.location);
        println!("primary:  {}", record.primary_emails.join(", "));
        println!("backup:   {}", record.backup_emails.join(", "));
        println!("reply-to: {}", record.reply_to);
        println!("from:     {}", record.from_address);
        return Ok(ExitCode::SUCCESS);
    }

    let address =
        startup::resolve_address(Mode::Monitor, &config, &mut notifier, device_id::resolve)?;

    // The directory is read again on every edge, so a bad file here is
    // only a warning: it can be fixed without restarting.
    match directory.lookup(&address) {
        Ok(record) => info!(
            "Directory: {} → {} (backup {})",
            record.location,
            record.primary_emails.join(", "),
            record.backup_emails.join(", ")
        ),
        Err(e) => warn!(
            "Directory {}: {} (alerts go to the fallback contact until fixed)",
            directory.path().display(),
            e
        ),
    }

    let mut contact = gpio::open_contact(&config).map_err(|e| {
        startup::report_failure(&config.fallback, &mut notifier, Some(&address), e.into())
    })?;
    info!(
        "Contact on GPIO{} (active {})",
        config.pin,
        if config.active_high { "high" } else { "low" }
    );

    let mut sink = LogEventSink::new();
    let mut service = MonitorService::new(&config, address.clone());
    if let Err(e) = service.start(&mut contact, &directory, &mut notifier, &mut sink) {
        let err = startup::report_failure(&config.fallback, &mut notifier, Some(&address), e.into());
        return Err(err.into());
    }

    service.run(&mut contact, &directory, &mut notifier, &mut sink)
}
