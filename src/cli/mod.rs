//!
//! stockdash command line
//! ----------------------
//! Drives the session authority and the inventory API from a terminal. The
//! session lives in a JSON file (see `ClientConfig::session_file`) which an
//! external login flow, or `session set`, populates.

pub mod outputformatter;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use tracing::debug;

use crate::config::{ClientConfig, OutputFormat};
use crate::dashboard::{NavMenu, SummaryCharts, NO_DATA_MESSAGE};
use crate::identity::{FileStore, SessionAuthority, TracingNavigator, UserProfile};
use crate::inventory::{InventoryApi, StockMovement, Summary, TransactionKind};

pub fn usage(program: &str) -> String {
    format!(
        "Usage:\n  {program} [--api <url>] [--session-file <path>] [--json] <command>\n\nCommands:\n  session set --token <t> --user <json>   store a session issued by the login service\n  session show                           show the stored session and capabilities\n  logout                                 clear the stored session\n  can                                    list capabilities of the current role\n  nav [--path <p>]                       show the navigation items for the current role\n  products                               list product names\n  summary [--start <d> --end <d>]        product totals (optionally within a date range)\n  enhanced                               product totals with price/profit analytics\n  history [--start <d>] [--end <d>]      individual add/sell transactions\n  add --product <n> --qty <q> --price <p> [--date <d>]\n  sell --product <n> --qty <q> --price <p> [--date <d>]\n  delete add|sell <id>                   delete a history entry\n  charts                                 chart datasets for the summary page (JSON)\n\nEnvironment:\n  STOCKDASH_API_URL, STOCKDASH_SESSION_FILE, STOCKDASH_LOGIN_PATH, STOCKDASH_OUTPUT=table|json\n\nDates are YYYY-MM-DD; add/sell default to today."
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SessionSet { token: String, user: String },
    SessionShow,
    Logout,
    Can,
    Nav { path: String },
    Products,
    Summary { start: Option<String>, end: Option<String> },
    Enhanced,
    History { start: Option<String>, end: Option<String> },
    Add(StockMovement),
    Sell(StockMovement),
    Delete { kind: TransactionKind, id: i64 },
    Charts,
    Help,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalOpts {
    pub api_url: Option<String>,
    pub session_file: Option<PathBuf>,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub global: GlobalOpts,
    pub command: Command,
}

fn take_value(args: &[String], i: &mut usize, flag: &str) -> Result<String> {
    *i += 1;
    args.get(*i).cloned().ok_or_else(|| anyhow!("{} requires a value", flag))
}

fn parse_date(s: &str) -> Result<String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", s))
}

/// Parse `args` (without the program name).
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut global = GlobalOpts::default();
    let mut positional: Vec<String> = Vec::new();
    let mut flags: Vec<(String, String)> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        let a = args[i].as_str();
        match a {
            "--api" => global.api_url = Some(take_value(args, &mut i, a)?),
            "--session-file" => global.session_file = Some(PathBuf::from(take_value(args, &mut i, a)?)),
            "--json" => global.json = true,
            "-h" | "--help" => return Ok(CliArgs { global, command: Command::Help }),
            "--token" | "--user" | "--path" | "--start" | "--end" | "--product" | "--qty" | "--price" | "--date" => {
                let v = take_value(args, &mut i, a)?;
                flags.push((a.trim_start_matches("--").to_string(), v));
            }
            other if other.starts_with("--") => return Err(anyhow!("unknown flag {}", other)),
            other => positional.push(other.to_string()),
        }
        i += 1;
    }
    let flag = |name: &str| flags.iter().rev().find(|(k, _)| k == name).map(|(_, v)| v.clone());
    let required = |name: &str| flag(name).ok_or_else(|| anyhow!("--{} is required", name));
    let date_flag = |name: &str| flag(name).map(|d| parse_date(&d)).transpose();

    let words: Vec<&str> = positional.iter().map(|s| s.as_str()).collect();
    let command = match words.as_slice() {
        [] | ["help"] => Command::Help,
        ["session", "set"] => Command::SessionSet { token: required("token")?, user: required("user")? },
        ["session"] | ["session", "show"] | ["whoami"] => Command::SessionShow,
        ["logout"] => Command::Logout,
        ["can"] => Command::Can,
        ["nav"] => Command::Nav { path: flag("path").unwrap_or_else(|| "/".to_string()) },
        ["products"] => Command::Products,
        ["summary"] => Command::Summary { start: date_flag("start")?, end: date_flag("end")? },
        ["enhanced"] => Command::Enhanced,
        ["history"] => Command::History { start: date_flag("start")?, end: date_flag("end")? },
        [verb @ ("add" | "sell")] => {
            let quantity: i64 = required("qty")?.parse().context("--qty must be an integer")?;
            if quantity <= 0 { return Err(anyhow!("--qty must be positive")); }
            let unit_price: f64 = required("price")?.parse().context("--price must be a number")?;
            if !unit_price.is_finite() || unit_price < 0.0 { return Err(anyhow!("--price must be a non-negative number")); }
            let date = match date_flag("date")? {
                Some(d) => d,
                None => chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
            };
            let m = StockMovement { product_name: required("product")?, quantity, unit_price, date };
            if *verb == "add" { Command::Add(m) } else { Command::Sell(m) }
        }
        ["delete", kind, id] => Command::Delete {
            kind: TransactionKind::parse(kind).ok_or_else(|| anyhow!("delete expects 'add' or 'sell', got '{}'", kind))?,
            id: id.parse().with_context(|| format!("invalid id '{}'", id))?,
        },
        ["charts"] => Command::Charts,
        other => return Err(anyhow!("unknown command '{}'", other.join(" "))),
    };
    Ok(CliArgs { global, command })
}

fn print_json<T: serde::Serialize>(v: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(v)?);
    Ok(())
}

/// Execute a parsed command against `config` (flags already override it).
pub async fn run(cli: CliArgs, mut config: ClientConfig) -> Result<()> {
    if let Some(url) = cli.global.api_url { config.api_url = url; }
    if let Some(path) = cli.global.session_file { config.session_file = path; }
    if cli.global.json { config.output = OutputFormat::Json; }
    let json = config.output == OutputFormat::Json;
    debug!(target: "stockdash::cli", api = %config.api_url, session_file = %config.session_file.display(), "cli config");

    let store = Arc::new(FileStore::open(config.session_file.clone()));
    let authority = Arc::new(
        SessionAuthority::new(store, Arc::new(TracingNavigator)).with_login_path(config.login_path.clone()),
    );
    // only the backend commands need a valid API URL
    let api = || InventoryApi::new(authority.clone(), &config.api_url);

    match cli.command {
        Command::Help => println!("{}", usage("stockdash")),
        Command::SessionSet { token, user } => {
            let profile: UserProfile = serde_json::from_str(&user).context("--user must be a JSON user profile")?;
            authority.store_session(&token, &profile)?;
            println!("session stored for {} ({})", profile.username, profile.role);
        }
        Command::SessionShow => {
            let user = authority.get_user();
            if json {
                print_json(&serde_json::json!({
                    "authenticated": authority.is_authenticated(),
                    "user": user,
                }))?;
            } else {
                println!("authenticated: {}", authority.is_authenticated());
                match user {
                    Some(u) => println!("user: {} (id {}, role {}, since {})", u.username, u.id, u.role, u.created_timestamp().map(|t| t.to_rfc3339()).unwrap_or_else(|| u.created_at.clone())),
                    None => println!("user: -"),
                }
                println!("{}", outputformatter::capabilities_table(&authority));
            }
        }
        Command::Logout => {
            authority.logout();
            println!("logged out; sign in again at {}", authority.login_path());
        }
        Command::Can => println!("{}", outputformatter::capabilities_table(&authority)),
        Command::Nav { path } => {
            let nav = NavMenu::default().render(&authority, &path);
            if json {
                print_json(&nav)?;
            } else {
                let who = nav.username.as_deref().unwrap_or("anonymous");
                println!("{} [{}]", nav.brand, who);
                for it in &nav.items {
                    println!("{} {:<14} {}", if it.active { "*" } else { " " }, it.label, it.href);
                }
            }
        }
        Command::Products => {
            let names = api()?.products().await?;
            if json { print_json(&names)?; } else { for n in names { println!("{}", n); } }
        }
        Command::Summary { start, end } => {
            let summary = api()?.summary(start.as_deref(), end.as_deref()).await?;
            if json {
                print_json(&summary.products())?;
            } else {
                println!("{}", outputformatter::products_table(summary.products()));
                if let Summary::Range(r) = &summary {
                    println!(
                        "in range: added {} (${}), sold {} (${})",
                        r.total_added_qty_in_range,
                        outputformatter::money(r.total_added_amount_in_range),
                        r.total_sold_qty_in_range,
                        outputformatter::money(r.total_sold_amount_in_range)
                    );
                }
            }
        }
        Command::Enhanced => {
            let products = api()?.enhanced_summary().await?;
            if json { print_json(&products)?; } else { println!("{}", outputformatter::products_table(&products)); }
        }
        Command::History { start, end } => {
            let txs = api()?.daily_history(start.as_deref(), end.as_deref()).await?;
            if json { print_json(&txs)?; } else { println!("{}", outputformatter::transactions_table(&txs)); }
        }
        Command::Add(m) => {
            let out = api()?.add_product(&m).await?;
            println!("{}", out.message);
            if !out.success { return Err(anyhow!("add failed")); }
        }
        Command::Sell(m) => {
            let out = api()?.sell_product(&m).await?;
            println!("{}", out.message);
            if !out.success { return Err(anyhow!("sale rejected")); }
        }
        Command::Delete { kind, id } => {
            let out = api()?.delete_history(kind, id).await?;
            println!("{}", out.message);
            if !out.success { return Err(anyhow!("delete failed")); }
        }
        Command::Charts => {
            let products = api()?.enhanced_summary().await?;
            match SummaryCharts::from_products(&products) {
                Some(charts) => print_json(&charts)?,
                None => println!("{}", NO_DATA_MESSAGE),
            }
        }
    }
    Ok(())
}
