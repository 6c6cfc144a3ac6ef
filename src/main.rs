//! CLI entry point for `contactrank`.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use contactrank::config::Config;
use contactrank::model::address::RecipientRole;
use contactrank::model::contact::ContactRecord;
use contactrank::query::view::{summaries, ContactDetailView};
use contactrank::query::ContactDetail;
use contactrank::session::Session;
use contactrank::source::{open_source, SourceFormat};

#[derive(Parser)]
#[command(
    name = "contactrank",
    version,
    about = "Rank your most frequent correspondents from a batch of message headers"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Source format: auto, json, mbox (default from config)
    #[arg(long, global = true, value_name = "FORMAT")]
    format: Option<String>,

    /// Maximum number of messages to read (default from config)
    #[arg(long, global = true, value_name = "N")]
    batch_limit: Option<usize>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a message batch and list contacts by frequency
    Scan {
        path: PathBuf,
        /// Only show contacts whose address or name contains this text
        #[arg(short, long)]
        query: Option<String>,
        /// Show at most N contacts
        #[arg(short, long)]
        top: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Show one contact's counters and most recent messages
    Detail {
        path: PathBuf,
        address: String,
        #[arg(long)]
        json: bool,
    },
    /// Show contact and message totals
    Stats {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Export the ranked contact list to CSV
    Export {
        path: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
    /// Print the effective configuration as TOML
    Config {
        /// Write it to the config file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = contactrank::config::load_config();
    if let Some(limit) = cli.batch_limit {
        config.scan.batch_limit = limit;
    }

    // Configure logging: stderr + optional log file
    let log_level = match cli.verbose {
        0 => config.general.log_level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    setup_logging(&log_level, &config);

    let format: SourceFormat = cli
        .format
        .as_deref()
        .unwrap_or(config.scan.default_format.as_str())
        .parse()?;

    match cli.command {
        Commands::Scan {
            path,
            query,
            top,
            json,
        } => cmd_scan(&path, format, query.as_deref(), top, json, &config),
        Commands::Detail {
            path,
            address,
            json,
        } => cmd_detail(&path, format, &address, json, &config),
        Commands::Stats { path, json } => cmd_stats(&path, format, json, &config),
        Commands::Export {
            path,
            output,
            query,
        } => cmd_export(&path, format, &output, query.as_deref(), &config),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
        Commands::Config { save } => cmd_config(&config, save),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_path = contactrank::config::log_file_path(config);
    let log_dir = contactrank::config::cache_dir(config);
    let log_name = log_path.file_name().unwrap_or_default();
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, log_name);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Read the source at `path` into a fresh session, with a spinner on stderr.
fn scan_into_session(
    path: &Path,
    format: SourceFormat,
    config: &Config,
) -> anyhow::Result<(Session, Duration)> {
    let mut source = open_source(path, format)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(format!("Scanning {}", source.describe()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let start = Instant::now();
    let mut session = Session::new(config.session_options());
    let result = session.scan(source.as_mut());
    pb.finish_and_clear();
    result?;

    Ok((session, start.elapsed()))
}

fn cmd_scan(
    path: &Path,
    format: SourceFormat,
    query: Option<&str>,
    top: Option<usize>,
    json: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let (session, elapsed) = scan_into_session(path, format, config)?;

    // 0 means unlimited
    let limit = match top.unwrap_or(config.display.top_limit) {
        0 => usize::MAX,
        n => n,
    };
    let contacts = match query.filter(|q| !q.trim().is_empty()) {
        Some(q) => {
            let mut matched = session.search(q);
            matched.truncate(limit);
            matched
        }
        None => session.top(limit),
    };

    if json {
        let output = serde_json::json!({
            "stats": session.stats(),
            "contacts": summaries(&contacts),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!(
        "  Scanned {} email(s) in {:.2?}",
        session.messages_scanned(),
        elapsed
    );
    print_stats_table(&session);

    if session.directory().is_empty() {
        println!("  No contacts found in your emails");
        println!();
        return Ok(());
    }
    if contacts.is_empty() {
        println!("  No contacts match your search");
        println!();
        return Ok(());
    }

    print_contacts_table(&contacts);
    Ok(())
}

fn cmd_detail(
    path: &Path,
    format: SourceFormat,
    address: &str,
    json: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let (session, _) = scan_into_session(path, format, config)?;
    let detail = session.detail(address)?;

    if json {
        let view = ContactDetailView::from(&detail);
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_detail(&detail, &config.display.date_format);
    }
    Ok(())
}

fn cmd_stats(path: &Path, format: SourceFormat, json: bool, config: &Config) -> anyhow::Result<()> {
    let (session, _) = scan_into_session(path, format, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session.stats())?);
    } else {
        println!();
        print_stats_table(&session);
    }
    Ok(())
}

fn cmd_export(
    path: &Path,
    format: SourceFormat,
    output: &Path,
    query: Option<&str>,
    config: &Config,
) -> anyhow::Result<()> {
    let (session, _) = scan_into_session(path, format, config)?;
    let contacts = session.search(query.unwrap_or(""));

    let csv_path = if output.extension().is_some() {
        output.to_path_buf()
    } else {
        output.join("contacts.csv")
    };
    if let Some(parent) = csv_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    contactrank::export::csv::export_csv(&contacts, &csv_path, config.export.csv_separator)?;
    println!(
        "  Exported {} contact(s) to {}",
        contacts.len(),
        csv_path.display()
    );
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "contactrank", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

fn cmd_config(config: &Config, save: bool) -> anyhow::Result<()> {
    if save {
        let path = contactrank::config::save_config(config)?;
        eprintln!("Saved configuration to {}", path.display());
    }
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

/// Print contact / message totals.
fn print_stats_table(session: &Session) {
    let stats = session.stats();
    println!("  {:<20} {}", "Contacts", stats.total_contacts);
    println!("  {:<20} {}", "Emails", stats.total_messages);
    println!("  {:<20} {:.1}", "Avg per contact", stats.avg_per_contact);
    println!();
}

/// Print a ranked contact list as a table.
fn print_contacts_table(contacts: &[&ContactRecord]) {
    println!(
        "  {:<4} {:>6} {:>5} {:>5} {:>5}  {:<25} {:<35}",
        "#", "Total", "To", "CC", "BCC", "Name", "Address"
    );
    println!("  {}", "-".repeat(92));

    for (i, c) in contacts.iter().enumerate() {
        let name = if c.has_display_name() {
            truncate(c.display_name(), 24)
        } else {
            String::new()
        };
        println!(
            "  {:<4} {:>6} {:>5} {:>5} {:>5}  {:<25} {:<35}",
            i + 1,
            c.total_count(),
            c.primary_count(),
            c.copy_count(),
            c.blind_copy_count(),
            name,
            truncate(c.address(), 34)
        );
    }
    println!();
}

/// Print one contact with its recent history.
fn print_detail(detail: &ContactDetail<'_>, date_format: &str) {
    let c = detail.header;

    println!();
    println!("  {}", c.display_name());
    if c.has_display_name() {
        println!("  {}", c.address());
    }

    let badges: Vec<String> = RecipientRole::ALL
        .iter()
        .filter(|&&role| c.count_for(role) > 0)
        .map(|&role| format!("{}: {}", role.label().to_uppercase(), c.count_for(role)))
        .collect();
    println!("  {}", badges.join("   "));
    println!();

    println!("  Recent Emails");
    println!("  {}", "-".repeat(72));
    for h in &detail.recent_history {
        let date = h
            .received_at
            .map(|d| d.format(date_format).to_string())
            .unwrap_or_else(|| "(no date)".to_string());
        println!(
            "  {:<4} {:<12} {}",
            h.role.label().to_uppercase(),
            date,
            truncate(&h.subject, 54)
        );
    }
    if detail.overflow_count > 0 {
        println!("  And {} more emails...", detail.overflow_count);
    }
    println!();
}

/// Cut `s` to at most `max` characters.
fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
