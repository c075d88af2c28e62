//! CLI definition and dispatch.
//!
//! Every cycle re-derives trade ids from the full order history on or after
//! `[poller] from_date`, then upserts the tagged rows by natural id.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_order_adapter::JsonOrderAdapter;
use crate::domain::account::{Account, AccountType};
use crate::domain::config_validation::{parse_from_date, validate_config, DEFAULT_INTERVAL_SECS};
use crate::domain::error::TradeTaggerError;
use crate::domain::execution_matcher::match_executions;
use crate::domain::order::{select_executions, select_stop_orders, BrokerOrder};
use crate::domain::records::{TaggedExecution, TaggedStopOrder};
use crate::domain::stop_matcher::match_stops;
use crate::domain::trade_summary::{summarize, TradeSummary};
use crate::ports::config_port::ConfigPort;
use crate::ports::order_port::OrderSource;
use crate::ports::store_port::TradeStore;

#[derive(Parser, Debug)]
#[command(name = "tradetagger", about = "Reconstruct trades from brokerage order history")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database schema
    InitDb {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Run one matching cycle
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Override `[input] orders`
        #[arg(long)]
        orders: Option<PathBuf>,
        /// Override `[poller] from_date` (YYYY-MM-DD)
        #[arg(long)]
        from_date: Option<String>,
        /// Print tagged rows instead of storing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Run matching cycles every `[poller] interval_secs`
    Poll {
        #[arg(short, long)]
        config: PathBuf,
        /// Stop after this many cycles
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        cycles: Option<u64>,
    },
    /// Print per-trade summaries from the store
    Trades {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    /// Explicit format wins; otherwise `.csv` files are CSV and anything else JSON.
    pub fn resolve(explicit: Option<&str>, path: &Path) -> Self {
        match explicit.map(|f| f.trim().to_lowercase()) {
            Some(f) if f == "csv" => InputFormat::Csv,
            Some(_) => InputFormat::Json,
            None => match path.extension().and_then(|e| e.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::Csv,
                _ => InputFormat::Json,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub orders_path: PathBuf,
    pub format: InputFormat,
    pub from_date: NaiveDate,
    pub interval: Duration,
    pub account: Account,
}

/// Counts gathered over one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub orders: usize,
    pub executions_selected: usize,
    pub executions_tagged: usize,
    pub executions_excluded: usize,
    pub executions_without_trade: usize,
    pub stops_selected: usize,
    pub stops_matched: usize,
    pub stops_unmatched: usize,
    pub new_executions: usize,
    pub new_stops: usize,
}

pub struct Derivation {
    pub executions: Vec<TaggedExecution>,
    pub stops: Vec<TaggedStopOrder>,
    pub report: CycleReport,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::InitDb { config } => run_init_db(&config),
        Command::Validate { config } => run_validate(&config),
        Command::Run {
            config,
            orders,
            from_date,
            dry_run,
        } => run_once(&config, orders, from_date.as_deref(), dry_run),
        Command::Poll { config, cycles } => run_poll(&config, cycles),
        Command::Trades { config } => run_trades(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        error!("{e}");
        ExitCode::from(&e)
    })
}

fn fail(err: TradeTaggerError) -> ExitCode {
    error!("{err}");
    ExitCode::from(&err)
}

pub fn build_run_settings(config: &dyn ConfigPort) -> Result<RunSettings, TradeTaggerError> {
    validate_config(config)?;

    let orders_path = config
        .get_string("input", "orders")
        .map(PathBuf::from)
        .ok_or_else(|| TradeTaggerError::ConfigMissing {
            section: "input".into(),
            key: "orders".into(),
        })?;
    let format = InputFormat::resolve(config.get_string("input", "format").as_deref(), &orders_path);

    let from_date = parse_from_date(config.get_string("poller", "from_date").as_deref())?;
    let interval_secs = config.get_int("poller", "interval_secs", DEFAULT_INTERVAL_SECS);

    let number = config
        .get_string("account", "number")
        .ok_or_else(|| TradeTaggerError::ConfigMissing {
            section: "account".into(),
            key: "number".into(),
        })?;
    let account_type = config
        .get_string("account", "type")
        .and_then(|t| AccountType::parse(&t))
        .unwrap_or(AccountType::Paper);

    Ok(RunSettings {
        orders_path,
        format,
        from_date,
        interval: Duration::from_secs(interval_secs as u64),
        account: Account {
            number: number.trim().to_string(),
            currency: config
                .get_string("account", "currency")
                .unwrap_or_else(|| "USD".to_string()),
            account_type,
        },
    })
}

pub fn order_source(settings: &RunSettings) -> Box<dyn OrderSource> {
    match settings.format {
        InputFormat::Json => Box::new(JsonOrderAdapter::new(settings.orders_path.clone())),
        InputFormat::Csv => Box::new(CsvAdapter::new(settings.orders_path.clone())),
    }
}

#[cfg(feature = "sqlite")]
pub fn open_store(config: &dyn ConfigPort) -> Result<Box<dyn TradeStore>, TradeTaggerError> {
    use crate::adapters::sqlite_adapter::SqliteAdapter;

    let store = SqliteAdapter::from_config(config)?;
    store.initialize_schema()?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "sqlite"))]
pub fn open_store(_config: &dyn ConfigPort) -> Result<Box<dyn TradeStore>, TradeTaggerError> {
    Err(TradeTaggerError::Database {
        reason: "sqlite feature is required for persistence".into(),
    })
}

/// Select executions and stops from `orders` and tag them with trade ids.
pub fn derive_trades(orders: &[BrokerOrder], from_date: NaiveDate) -> Derivation {
    let executions = select_executions(orders, from_date);
    let stops = select_stop_orders(orders, from_date);
    let executions_selected = executions.len();
    let stops_selected = stops.len();

    let tagged_executions = match_executions(executions);
    let tagged_stops = match_stops(stops, &tagged_executions);

    let report = CycleReport {
        orders: orders.len(),
        executions_selected,
        executions_tagged: tagged_executions.len(),
        executions_excluded: executions_selected - tagged_executions.len(),
        executions_without_trade: tagged_executions
            .iter()
            .filter(|t| t.trade_id.is_none())
            .count(),
        stops_selected,
        stops_matched: tagged_stops.len(),
        stops_unmatched: stops_selected - tagged_stops.len(),
        new_executions: 0,
        new_stops: 0,
    };

    Derivation {
        executions: tagged_executions,
        stops: tagged_stops,
        report,
    }
}

/// Fetch, derive and persist once.
pub fn run_cycle(
    source: &dyn OrderSource,
    store: &dyn TradeStore,
    settings: &RunSettings,
) -> Result<CycleReport, TradeTaggerError> {
    let orders = source.fetch_orders()?;
    let Derivation {
        executions,
        stops,
        mut report,
    } = derive_trades(&orders, settings.from_date);
    log_derivation(&report);

    let account = &settings.account;
    store.upsert_account(account)?;

    if !executions.is_empty() {
        report.new_executions = store.upsert_executions(&executions, &account.number)?;
        info!(
            account = %account.number,
            new = report.new_executions,
            total = executions.len(),
            "executions stored"
        );
    }

    if !stops.is_empty() {
        report.new_stops = store.upsert_stop_orders(&stops, &account.number)?;
        info!(
            account = %account.number,
            new = report.new_stops,
            total = stops.len(),
            "stop orders stored"
        );
    }

    Ok(report)
}

fn log_derivation(report: &CycleReport) {
    debug!(orders = report.orders, "orders fetched");
    if report.executions_excluded > 0 {
        warn!(
            count = report.executions_excluded,
            "executions without an entry/close intent excluded"
        );
    }
    if report.executions_without_trade > 0 {
        warn!(
            count = report.executions_without_trade,
            "closes with no prior entry left without trade id"
        );
    }
    if report.stops_unmatched > 0 {
        info!(count = report.stops_unmatched, "stop orders with no open entry lot dropped");
    }
}

/// Run `cycles` cycles (forever when `None`), sleeping `settings.interval`
/// between them. A failed cycle is logged and the loop carries on. Returns
/// the number of failed cycles.
pub fn poll_loop(
    source: &dyn OrderSource,
    store: &dyn TradeStore,
    settings: &RunSettings,
    cycles: Option<u64>,
) -> u64 {
    let mut completed = 0u64;
    let mut failures = 0u64;

    while cycles.is_none_or(|limit| completed < limit) {
        if completed > 0 {
            thread::sleep(settings.interval);
        }

        match run_cycle(source, store, settings) {
            Ok(report) => debug!(?report, "cycle complete"),
            Err(e) => {
                failures += 1;
                error!(account = %settings.account.number, "cycle failed: {e}");
            }
        }
        completed += 1;
    }

    failures
}

fn settings_from(config_path: &Path) -> Result<(FileConfigAdapter, RunSettings), ExitCode> {
    info!("loading config from {}", config_path.display());
    let config = load_config(config_path)?;
    let settings = build_run_settings(&config).map_err(fail)?;
    Ok((config, settings))
}

fn run_init_db(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match open_store(&config) {
        Ok(_) => {
            info!("database schema ready");
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    let (_, settings) = match settings_from(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    println!("orders:    {} ({:?})", settings.orders_path.display(), settings.format);
    println!("from_date: {}", settings.from_date);
    println!("interval:  {}s", settings.interval.as_secs());
    println!(
        "account:   {} ({}, {})",
        settings.account.number, settings.account.account_type, settings.account.currency
    );
    info!("configuration is valid");
    ExitCode::SUCCESS
}

fn run_once(
    config_path: &Path,
    orders_override: Option<PathBuf>,
    from_date_override: Option<&str>,
    dry_run: bool,
) -> ExitCode {
    let (config, mut settings) = match settings_from(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    if let Some(path) = orders_override {
        settings.format = InputFormat::resolve(None, &path);
        settings.orders_path = path;
    }
    if let Some(date) = from_date_override {
        settings.from_date = match parse_from_date(Some(date)) {
            Ok(d) => d,
            Err(e) => return fail(e),
        };
    }

    let source = order_source(&settings);

    if dry_run {
        let orders = match source.fetch_orders() {
            Ok(o) => o,
            Err(e) => return fail(e),
        };
        let derivation = derive_trades(&orders, settings.from_date);
        log_derivation(&derivation.report);
        print_derivation(&derivation);
        return ExitCode::SUCCESS;
    }

    let store = match open_store(&config) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    match run_cycle(source.as_ref(), store.as_ref(), &settings) {
        Ok(report) => {
            println!(
                "executions: {} new / {} tagged, stops: {} new / {} matched",
                report.new_executions,
                report.executions_tagged,
                report.new_stops,
                report.stops_matched
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_poll(config_path: &Path, cycles: Option<u64>) -> ExitCode {
    let (config, settings) = match settings_from(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let store = match open_store(&config) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let source = order_source(&settings);

    info!(
        account = %settings.account.number,
        interval_secs = settings.interval.as_secs(),
        "polling"
    );
    let failures = poll_loop(source.as_ref(), store.as_ref(), &settings, cycles);

    if failures > 0 {
        warn!(failures, "some cycles failed");
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn run_trades(config_path: &Path) -> ExitCode {
    let (config, settings) = match settings_from(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let store = match open_store(&config) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    match store.trade_summaries(&settings.account.number) {
        Ok(summaries) => {
            print_summaries(&summaries);
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn print_derivation(derivation: &Derivation) {
    println!("execution_id,symbol,position_intent,filled_at,filled_qty,parent_order_id,trade_id");
    for t in &derivation.executions {
        let e = &t.execution;
        println!(
            "{},{},{},{},{},{},{}",
            e.id,
            e.symbol,
            e.position_intent,
            e.filled_at.map(|ts| ts.to_rfc3339()).unwrap_or_default(),
            t.filled_qty,
            e.parent_order_id.as_deref().unwrap_or(""),
            t.trade_id.map(|id| id.to_string()).unwrap_or_default(),
        );
    }

    println!();
    println!("stop_id,symbol,created_at,qty,stop_price,trade_id");
    for t in &derivation.stops {
        let s = &t.stop;
        println!(
            "{},{},{},{},{},{}",
            s.id,
            s.symbol,
            s.created_at.map(|ts| ts.to_rfc3339()).unwrap_or_default(),
            t.qty,
            s.stop_price.map(|p| p.to_string()).unwrap_or_default(),
            t.trade_id,
        );
    }

    println!();
    print_summaries(&summarize(&derivation.executions, &derivation.stops));
}

fn print_summaries(summaries: &[TradeSummary]) {
    if summaries.is_empty() {
        println!("no trades");
        return;
    }

    println!(
        "{:>6}  {:<8} {:>10} {:>10} {:>8} {:>6}  {}",
        "trade", "symbol", "entry", "closed", "fills", "stops", "status"
    );
    for s in summaries {
        println!(
            "{:>6}  {:<8} {:>10} {:>10} {:>8} {:>6}  {}",
            s.trade_id,
            s.symbol,
            s.entry_qty,
            s.close_qty,
            s.executions,
            s.stops,
            if s.is_flat() { "closed" } else { "open" },
        );
    }
}
