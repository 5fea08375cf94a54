use std::fmt;
use std::sync::Arc;

use detective_core::model::{Address, CaseId};
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{
    AddressAnalyzer, AppConfig, AppServices, Clock, LeaderboardService, Lookup, PlaygroundService,
    QuizLoopService,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, DesktopLinkOpener, LinkOpenerRef, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingAddress,
    UnknownArg(String),
    InvalidCaseId { raw: String },
    InvalidAddress { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingAddress => write!(f, "analyze requires an address"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCaseId { raw } => write!(f, "invalid --case value: {raw}"),
            ArgsError::InvalidAddress { raw } => write!(f, "invalid --player value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
    opener: LinkOpenerRef,
}

impl UiApp for DesktopApp {
    fn case_id(&self) -> CaseId {
        self.services.case_id()
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        self.services.quiz_loop()
    }

    fn leaderboard(&self) -> Arc<LeaderboardService> {
        self.services.leaderboard()
    }

    fn analyzer(&self) -> Arc<AddressAnalyzer> {
        self.services.analyzer()
    }

    fn playground(&self) -> Arc<PlaygroundService> {
        self.services.playground()
    }

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::clone(&self.opener)
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  base-detective ui          [--case <id>] [--bank <path>]");
    eprintln!("  base-detective analyze     <address>");
    eprintln!("  base-detective status      [--case <id>] [--player <address>]");
    eprintln!("  base-detective leaderboard");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --case 1, built-in question bank, Base mainnet RPC");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DETECTIVE_RPC_URL, DETECTIVE_CHAIN_ID, DETECTIVE_CONTRACT_ADDRESS,");
    eprintln!("  DETECTIVE_EXPLORER_API_URL, DETECTIVE_EXPLORER_API_KEY, DETECTIVE_EXPLORER_URL,");
    eprintln!("  DETECTIVE_NEYNAR_API_KEY, DETECTIVE_NEYNAR_URL,");
    eprintln!("  DETECTIVE_MINIAPP_PROVIDER_URL, DETECTIVE_WALLET_URL,");
    eprintln!("  DETECTIVE_QUESTION_BANK, DETECTIVE_CASE_ID, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Analyze,
    Status,
    Leaderboard,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "analyze" => Some(Self::Analyze),
            "status" => Some(Self::Status),
            "leaderboard" => Some(Self::Leaderboard),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    case_id: Option<CaseId>,
    bank: Option<String>,
    player: Option<Address>,
    target: Option<String>,
}

impl Args {
    fn parse(
        cmd: Command,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--case" => {
                    let value = require_value(args, "--case")?;
                    let case_id = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidCaseId { raw: value.clone() })?;
                    parsed.case_id = Some(case_id);
                }
                "--bank" => parsed.bank = Some(require_value(args, "--bank")?),
                "--player" if cmd == Command::Status => {
                    let value = require_value(args, "--player")?;
                    let player = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidAddress { raw: value.clone() })?;
                    parsed.player = Some(player);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if cmd == Command::Analyze
                    && parsed.target.is_none()
                    && !arg.starts_with("--") =>
                {
                    parsed.target = Some(arg);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if cmd == Command::Analyze && parsed.target.is_none() {
            return Err(ArgsError::MissingAddress);
        }
        Ok(parsed)
    }

    fn apply(&self, config: &mut AppConfig) {
        if let Some(case_id) = self.case_id {
            config.case_id = case_id;
        }
        if let Some(bank) = &self.bank {
            config.question_bank = Some(bank.clone());
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    info!(command = ?cmd, "starting");
    let mut config = AppConfig::from_env()?;
    parsed.apply(&mut config);
    let services = AppServices::from_config(&config, Clock::default_clock())?;

    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                services,
                opener: Arc::new(DesktopLinkOpener),
            });
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Base Detective")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Analyze => {
            let target = parsed.target.unwrap_or_default();
            let report = services.analyzer().analyze(&target).await?;
            println!("address:  {}", report.checksum_address());
            println!(
                "type:     {}",
                if report.has_bytecode { "contract" } else { "account" }
            );
            println!("bytecode: {} bytes", report.bytecode_len);
            println!("balance:  {} ETH", report.balance_eth);
            println!("explorer: {}", report.explorer_url);
            match &report.source {
                Some(Lookup::Found(source)) if source.verified => println!(
                    "source:   verified ({})",
                    source.contract_name.as_deref().unwrap_or("unnamed")
                ),
                Some(Lookup::Found(_)) => println!("source:   not verified"),
                Some(Lookup::Unavailable(reason)) => println!("source:   unavailable ({reason})"),
                None => {}
            }
            if let Some(Lookup::Found(txs)) = &report.recent_transactions {
                for tx in txs {
                    let status = if tx.failed { " failed" } else { "" };
                    println!("tx:       {}{status}", tx.hash);
                }
            }
            Ok(())
        }
        Command::Status => {
            let status = services
                .quiz_loop()
                .case_status(services.case_id(), parsed.player)
                .await?;
            println!("player:   {}", status.player.to_checksum());
            println!("case:     {}", status.case_id);
            if !status.record.is_started() {
                println!("status:   not started");
                return Ok(());
            }
            println!(
                "status:   {}",
                if status.record.completed { "completed" } else { "started" }
            );
            if let Some(verdict) = status.record.verdict() {
                println!("verdict:  {verdict}");
            }
            if let Some(recorded_at) = status.record.recorded_at() {
                println!("recorded: {}", recorded_at.to_rfc3339());
            }
            println!("seed:     {}", status.record.seed_hex());
            Ok(())
        }
        Command::Leaderboard => {
            let entries = services.leaderboard().load().await?;
            if entries.is_empty() {
                println!("no cases closed yet");
            }
            for entry in entries {
                println!("{:>3}. {:<24} {}", entry.rank, entry.display(), entry.cases);
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
