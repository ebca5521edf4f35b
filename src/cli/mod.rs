//! CLI command implementations.
//!
//! Each command opens one session (a [`Controller`] over the configured
//! backend, durable storage and activity log), runs the matching action and
//! prints the outcome. Alerts raised by the action go to stderr.
//!
//! - `sentimen login|logout|whoami`: session management
//! - `sentimen classify|history|feedback`: single-text analysis
//! - `sentimen batch|scrape|battle|dashboard`: the other views
//! - `sentimen activity`: tail of the local activity log
//! - `sentimen config show|init|set`: configuration management

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};

use crate::api::UreqTransport;
use crate::auth::AuthClient;
use crate::config::{self, SentimenConfig};
use crate::controller::Controller;
use crate::events::{ActivityEvent, ActivityLog, Outcome};
use crate::models::{confidence_pct, Sentiment, SentimentCounts};
use crate::render::{format_number, format_time, percentage};
use crate::state::AppState;
use crate::storage::{FileStorage, MemoryStorage};

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Build a controller for one session: durable storage and the activity log
/// live in the configured data directory; session storage is in memory.
/// History is only fetched by the commands that show it.
pub fn open_controller(config: &SentimenConfig) -> Result<Controller<UreqTransport>> {
    let data_dir = config
        .storage
        .data_dir()
        .context("could not determine data directory (set storage.dir)")?;

    let durable = FileStorage::open(FileStorage::default_path(&data_dir));
    let state = AppState::new(
        AuthClient::new(Box::new(durable)),
        Box::new(MemoryStorage::new()),
    );
    let activity = if config.logging.events {
        ActivityLog::new(ActivityLog::default_path(&data_dir))
    } else {
        ActivityLog::disabled()
    };

    log::debug!(
        "backend {} (timeout {:?}), data dir {}",
        config.backend.base_url,
        config.backend.timeout(),
        data_dir.display()
    );
    let transport = UreqTransport::new(&config.backend.base_url, config.backend.timeout());

    Ok(Controller::with_state(transport, state)
        .with_settings(config.ui.settings())
        .with_activity(activity))
}

/// Print and clear every alert the last action raised.
fn drain_alerts(controller: &mut Controller<UreqTransport>, ok: bool) {
    for alert in controller.take_alerts() {
        if ok {
            eprintln!("{}", alert.green());
        } else {
            eprintln!("{}", alert.red());
        }
    }
}

/// Drain alerts and turn a missing payload into a non-zero exit.
fn settle<P>(controller: &mut Controller<UreqTransport>, payload: Option<P>, action: &str) -> Result<P> {
    drain_alerts(controller, payload.is_some());
    payload.with_context(|| format!("{action} failed"))
}

// ---------------------------------------------------------------------------
// sentimen login | logout | whoami
// ---------------------------------------------------------------------------

pub fn run_login(config: &SentimenConfig, username: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt("Password: ")?,
    };

    let mut controller = open_controller(config)?;
    controller.set_field("loginUsername", username);
    controller.set_field("loginPassword", &password);

    if controller.handle_login() {
        let user = controller.state().auth.user();
        let name = user.as_ref().map_or(username, |u| u.username.as_str());
        println!("{} Logged in as {}", "✓".green().bold(), name.bold());
        Ok(())
    } else {
        let message = controller.document().text("loginError").to_string();
        eprintln!("{}", message.red());
        anyhow::bail!("login failed")
    }
}

pub fn run_logout(config: &SentimenConfig) -> Result<()> {
    let mut controller = open_controller(config)?;
    controller.logout();
    println!("{} Logged out", "✓".green().bold());
    Ok(())
}

pub fn run_whoami(config: &SentimenConfig) -> Result<()> {
    let controller = open_controller(config)?;
    let auth = &controller.state().auth;
    if !auth.is_logged_in() {
        println!("{}", "Not logged in. Run `sentimen login <username>`.".yellow());
        return Ok(());
    }
    let name = auth.user().map_or_else(|| "User".to_string(), |u| u.username);
    println!("Hi, {}", name.bold());
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush().context("failed to flush stdout")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

// ---------------------------------------------------------------------------
// sentimen classify | history | feedback
// ---------------------------------------------------------------------------

pub fn run_classify(config: &SentimenConfig, text: &str) -> Result<()> {
    let mut controller = open_controller(config)?;
    controller.set_field("inputText", text);
    let payload = controller.analyze_sentiment();
    let result = settle(&mut controller, payload, "analysis")?;

    println!(
        "  {} {}",
        "Sentiment: ".bold(),
        colorize_sentiment(&result.sentiment).bold()
    );
    println!(
        "  {} {}%",
        "Confidence:".bold(),
        confidence_pct(result.confidence)
    );
    if !result.aspects.is_empty() {
        println!("  {}", "Aspects:".bold());
        for aspect in &result.aspects {
            println!("    {:<20} {}", aspect.aspect, colorize_sentiment(&aspect.sentiment));
        }
    }
    Ok(())
}

pub fn run_history(config: &SentimenConfig) -> Result<()> {
    let mut controller = open_controller(config)?;
    let entries = controller.load_history();
    drain_alerts(&mut controller, true);

    if entries.is_empty() {
        println!("{}", "Belum ada riwayat".yellow());
        return Ok(());
    }

    println!("{}", "Riwayat Analisis".bold().cyan());
    println!("{}", "=".repeat(60));
    println!("  {:<6} {:<6} {:<9} Text", "ID", "Time", "Sentiment");
    println!("  {}", "-".repeat(58));
    for entry in &entries {
        let id = entry.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string());
        let time = entry.recorded_at().map_or_else(|| "-".to_string(), format_time);
        println!(
            "  {:<6} {:<6} {:<9} {}",
            id,
            time,
            colorize_sentiment(&entry.sentiment),
            truncate(&entry.text, 40)
        );
    }

    let [pos, neg, neu] = crate::render::history_percentages(&entries);
    println!();
    println!(
        "  {} {}  Positif {pos}%  Negatif {neg}%  Netral {neu}%",
        "Total:".bold(),
        entries.len()
    );
    Ok(())
}

pub fn run_feedback(config: &SentimenConfig, analysis_id: i64, correction: &str) -> Result<()> {
    let mut controller = open_controller(config)?;
    controller.open_feedback(analysis_id);
    let saved = controller.submit_feedback(correction);
    settle(&mut controller, saved.then_some(()), "feedback")
}

// ---------------------------------------------------------------------------
// sentimen batch
// ---------------------------------------------------------------------------

pub fn run_batch(config: &SentimenConfig, file: &Path, csv_out: Option<&Path>) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("not a file: {}", file.display()))?;

    let mut controller = open_controller(config)?;
    if !controller.select_file(&name, bytes) {
        drain_alerts(&mut controller, false);
        anyhow::bail!("unsupported file type: {name}");
    }
    let payload = controller.analyze_batch();
    let batch = settle(&mut controller, payload, "batch analysis")?;

    println!("{}", format!("Batch: {name}").bold().cyan());
    println!("{}", "=".repeat(60));
    print_counts(&batch.stats);

    if let Some(products) = batch.product_stats.as_ref().filter(|_| batch.has_products) {
        let mut ranked: Vec<_> = products.iter().collect();
        ranked.sort_by(|a, b| b.1.positive_pct.total_cmp(&a.1.positive_pct));
        println!();
        println!("{}", "Product Ranking".bold().cyan());
        for (product, stats) in ranked {
            let pct = format!("{}%", format_number(stats.positive_pct));
            let pct = if stats.positive_pct >= 70.0 {
                pct.green()
            } else if stats.positive_pct >= 50.0 {
                pct.yellow()
            } else {
                pct.red()
            };
            println!("  {:<24} {:>6} positif  ({} ulasan)", truncate(product, 24), pct, stats.total);
        }
    }

    if let Some(insights) = batch.insights.as_ref().filter(|i| !i.is_empty()) {
        println!();
        println!("{}", "Insights".bold().cyan());
        for insight in insights {
            println!("  {} {} {}", insight.icon, insight.title.bold(), insight.message.dimmed());
        }
    }

    println!();
    let preview = config.ui.preview_rows;
    println!("{}", format!("Preview (first {preview})").bold().cyan());
    for row in batch.results.iter().take(preview) {
        println!(
            "  {:<9} {:>4}%  {}",
            colorize_sentiment(&row.sentiment),
            confidence_pct(row.confidence),
            truncate(&row.text, 50)
        );
    }

    if let Some(out) = csv_out {
        let download = controller
            .download_batch_csv()
            .context("no rows to export")?;
        fs::write(out, download.content)
            .with_context(|| format!("failed to write {}", out.display()))?;
        println!();
        println!("{} CSV written to {}", "✓".green().bold(), out.display());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// sentimen scrape | battle
// ---------------------------------------------------------------------------

pub fn run_scrape(config: &SentimenConfig, url: &str, save_label: Option<&str>) -> Result<()> {
    let mut controller = open_controller(config)?;
    controller.set_field("socialUrl", url);
    let payload = controller.analyze_social();
    let scrape = settle(&mut controller, payload, "scrape")?;

    println!("{}", "YouTube Comments".bold().cyan());
    println!("{}", "=".repeat(60));
    print_counts(&scrape.stats);
    println!();
    for comment in scrape.results.iter().take(20) {
        println!(
            "  {:<9} {:>4}%  {}",
            colorize_sentiment(&comment.sentiment),
            confidence_pct(comment.confidence),
            truncate(&comment.text, 50)
        );
    }
    if scrape.results.len() > 20 {
        println!("  {}", format!("... {} more", scrape.results.len() - 20).dimmed());
    }

    if let Some(label) = save_label {
        controller.set_field("saveAnalysisLabel", label);
        let saved = controller.save_youtube_analysis();
        settle(&mut controller, saved, "save")?;
    }
    Ok(())
}

pub fn run_battle(config: &SentimenConfig, url_a: &str, url_b: &str) -> Result<()> {
    let mut controller = open_controller(config)?;
    controller.set_field("battleUrlA", url_a);
    controller.set_field("battleUrlB", url_b);
    let payload = controller.start_battle();
    let battle = settle(&mut controller, payload, "battle")?;

    println!("{}", "Brand Battle".bold().cyan());
    println!("{}", "=".repeat(60));
    for (side, score) in [("A", &battle.brand_a), ("B", &battle.brand_b)] {
        println!(
            "  {} {:>6}  {} positif / {} negatif",
            format!("Brand {side}:").bold(),
            format!("{}%", format_number(score.positive_pct)),
            score.stats.positif,
            score.stats.negatif
        );
    }
    println!();
    let verdict = &battle.verdict;
    if verdict.gap > 0.0 {
        println!("  🏆 {}", verdict.title.green().bold());
    } else {
        println!("  ⚠️ {}", verdict.title.red().bold());
    }
    println!("  {}", verdict.message);
    Ok(())
}

// ---------------------------------------------------------------------------
// sentimen dashboard
// ---------------------------------------------------------------------------

pub fn run_dashboard(config: &SentimenConfig) -> Result<()> {
    let mut controller = open_controller(config)?;
    let Some(data) = controller.load_dashboard() else {
        println!(
            "{}",
            "Dashboard requires login. Run `sentimen login <username>`.".yellow()
        );
        return Ok(());
    };
    drain_alerts(&mut controller, true);

    println!("{}", "Dashboard".bold().cyan());
    println!("{}", "=".repeat(50));
    match data.summary {
        Some(summary) => {
            println!("  {} {}", "Total analyses:".bold(), summary.total);
            println!("  {} {}", "Positive:      ".bold(), summary.positive);
            println!("  {} {}", "Negative:      ".bold(), summary.negative);
        }
        None => println!("  {}", "summary unavailable".dimmed()),
    }

    if let Some(trend) = data.trend.filter(|t| !t.dates.is_empty()) {
        println!();
        println!("{}", "Trend".bold().cyan());
        println!("  {:<12} {:>8} {:>8} {:>8}", "Date", "Positif", "Negatif", "Netral");
        println!("  {}", "-".repeat(40));
        for (i, date) in trend.dates.iter().enumerate() {
            let at = |series: &[u64]| series.get(i).copied().unwrap_or(0);
            println!(
                "  {:<12} {:>8} {:>8} {:>8}",
                date,
                at(&trend.positive),
                at(&trend.negative),
                at(&trend.neutral)
            );
        }
    }

    if let Some(mut words) = data.words.filter(|w| !w.is_empty()) {
        words.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        let top: Vec<_> = words.iter().take(15).map(|w| w.text.as_str()).collect();
        println!();
        println!("{}", "Top Words".bold().cyan());
        println!("  {}", top.join(", "));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// sentimen activity
// ---------------------------------------------------------------------------

pub fn run_activity(config: &SentimenConfig, limit: usize, format: OutputFormat) -> Result<()> {
    let data_dir = config
        .storage
        .data_dir()
        .context("could not determine data directory (set storage.dir)")?;
    let log = ActivityLog::new(ActivityLog::default_path(&data_dir));
    let entries = log.read_recent(limit);

    if entries.is_empty() {
        println!("{}", "No activity recorded yet.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Table => print_activity_table(&entries),
    }
    Ok(())
}

fn print_activity_table(entries: &[ActivityEvent]) {
    println!("{}", "Recent Activity".bold().cyan());
    println!("{}", "=".repeat(70));
    println!(
        "  {:<20} {:<22} {:<10} {:>6} {:>8}",
        "Time", "Action", "Outcome", "Status", "Latency"
    );
    println!("  {}", "-".repeat(68));

    for entry in entries {
        let time = chrono::DateTime::parse_from_rfc3339(&entry.timestamp)
            .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| entry.timestamp.clone());
        let status = entry.status.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<20} {:<22} {:<10} {:>6} {:>6}ms",
            time,
            entry.action,
            colorize_outcome(entry.outcome),
            status,
            entry.latency_ms
        );
        if let Some(detail) = &entry.detail {
            println!("  {}", truncate(detail, 66).dimmed());
        }
    }
}

// ---------------------------------------------------------------------------
// sentimen config show | init | set
// ---------------------------------------------------------------------------

pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective sentimen Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source(global_exists, "~/.sentimen/config.toml");
    print_source(project_exists, ".sentimen.toml");
    println!(
        "  {} {}",
        "·".dimmed(),
        "SENTIMEN_* environment variables".dimmed()
    );
    Ok(())
}

fn print_source(exists: bool, name: &str) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!("  {}", "Edit the file to point at your backend.".dimmed());
    Ok(())
}

pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    let path = config::set_config_value(key, value)?;
    println!(
        "{} Set {} = {} in {}",
        "✓".green().bold(),
        key.bold(),
        value,
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

fn print_counts(counts: &SentimentCounts) {
    let total = (counts.positif + counts.negatif + counts.netral) as usize;
    println!(
        "  {} {} ({}%)  {} {} ({}%)  {} {} ({}%)",
        "Positif".green(),
        counts.positif,
        percentage(counts.positif as usize, total),
        "Negatif".red(),
        counts.negatif,
        percentage(counts.negatif as usize, total),
        "Netral".blue(),
        counts.netral,
        percentage(counts.netral as usize, total),
    );
}

/// Truncate to `max_chars` characters, appending "…" if truncated.
fn truncate(s: &str, max_chars: usize) -> String {
    let flat = s.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let kept: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

fn colorize_sentiment(sentiment: &Sentiment) -> ColoredString {
    let label = sentiment.as_str();
    match sentiment {
        Sentiment::Positif => label.green(),
        Sentiment::Negatif => label.red(),
        Sentiment::Netral => label.blue(),
        Sentiment::Other(_) => label.normal(),
    }
}

fn colorize_outcome(outcome: Outcome) -> ColoredString {
    match outcome {
        Outcome::Success => outcome.as_str().green(),
        Outcome::Validation => outcome.as_str().yellow(),
        Outcome::Failure => outcome.as_str().red(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
