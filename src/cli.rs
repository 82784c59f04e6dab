// src/cli.rs
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use tokio_util::sync::CancellationToken;

use crate::config::consts::DEFAULT_DISPLAY_COLUMNS;
use crate::config::Options;
use crate::notify::format::console_message;
use crate::notify::Dispatcher;
use crate::poller::{CycleOutcome, Poller};
use crate::session::{Portal, SessionClient};
use crate::specs::report::{self, ReportSpec};

#[derive(Debug, Parser)]
#[command(name = "score_watch", version, about = "Watch a school portal for newly posted grades")]
pub struct Cli {
    /// Config file (default: config.local.toml if present, else config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging; same as `debug = true` in the config
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll the portal until interrupted (default)
    Watch {
        /// Run one cycle and exit
        #[arg(long)]
        once: bool,
    },
    /// Parse a saved report page and print its records
    Parse {
        file: PathBuf,
        /// Pretty JSON instead of one line per record
        #[arg(long)]
        json: bool,
    },
    /// Log in once and report whether the credentials work
    Check,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        None => watch(cli.config, cli.debug, false),
        Some(Command::Watch { once }) => watch(cli.config, cli.debug, once),
        Some(Command::Parse { ref file, json }) => parse(&cli, file, json),
        Some(Command::Check) => check(cli.config, cli.debug),
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("cannot start async runtime")
}

fn banner() {
    logf!("{} v{} started", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
}

fn watch(config: Option<PathBuf>, debug: bool, once: bool) -> Result<()> {
    let path = Options::locate(config);
    let opts = Options::load(&path)?;
    let debug = debug || opts.debug;
    let _log = crate::log::init(debug, opts.log_path().as_deref())?;
    banner();
    logd!("Config: {}", path.display());

    let interval = opts.interval()?;
    let portal = SessionClient::new(&opts.base_url()?)?;
    let dispatcher = Dispatcher::from_options(&opts)?;
    if dispatcher.is_empty() {
        logw!("No notification channel enabled; new grades will only be logged");
    } else {
        logf!("Notification channels: {}", dispatcher.channel_names().join(", "));
    }

    let mut poller =
        Poller::new(portal, opts.credentials(), dispatcher, opts.report_spec(), interval);

    let rt = runtime()?;
    rt.block_on(async move {
        let shutdown = CancellationToken::new();
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                logf!("Interrupted, shutting down");
                trigger.cancel();
            }
        });

        if once {
            return match poller.run_once(&shutdown).await {
                Some(CycleOutcome::Failed(e)) => Err(e).wrap_err("cycle failed"),
                Some(CycleOutcome::Crashed(msg)) => bail!("cycle crashed: {msg}"),
                _ => Ok(()),
            };
        }

        poller.run(shutdown).await;
        Ok(())
    })
}

fn parse(cli: &Cli, file: &Path, json: bool) -> Result<()> {
    // Report layout and columns come from the config when one is around.
    let path = Options::locate(cli.config.clone());
    let opts = if cli.config.is_some() || path.is_file() {
        Some(Options::load(&path)?)
    } else {
        None
    };
    let _log = crate::log::init(cli.debug || opts.as_ref().is_some_and(|o| o.debug), None)?;

    let (spec, columns) = match &opts {
        Some(o) => (o.report_spec(), o.display_columns.clone()),
        None => (
            ReportSpec::default(),
            DEFAULT_DISPLAY_COLUMNS.iter().map(|c| s!(*c)).collect(),
        ),
    };

    let records = report::parse_file(file, &spec)?;
    logd!("Parsed {} records from {}", records.len(), file.display());

    let out = if json {
        serde_json::to_string_pretty(&records).wrap_err("cannot serialise records")?
    } else {
        console_message(&records, &columns)
    };
    println!("{out}");
    Ok(())
}

fn check(config: Option<PathBuf>, debug: bool) -> Result<()> {
    let opts = Options::load(&Options::locate(config))?;
    let _log = crate::log::init(debug || opts.debug, None)?;
    banner();

    let mut portal = SessionClient::new(&opts.base_url()?)?;
    let creds = opts.credentials();

    runtime()?.block_on(async move {
        portal.login(&creds).await.wrap_err("login failed")?;
        if !portal.is_authenticated().await {
            bail!("logged in, but the portal still asks for a login");
        }
        logf!("Credentials for {} accepted; session is live", creds.username());
        Ok(())
    })
}

/// Wait for Enter before the console window goes away.
/// No-op when stdin is not a terminal.
pub fn pause(msg: &str) {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return;
    }
    eprint!("{msg}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    let _ = stdin.lock().read_line(&mut line);
}
