use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use scalingo_tables::config::ConnectionConfig;
use scalingo_tables::plugin::{
    plugin, scan_get, scan_list, ConnectionCache, RowSink, ScanOptions,
};
use scalingo_tables::scalingo::format_api_error;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Query Scalingo platform resources as tables
#[derive(Parser, Debug)]
#[command(name = "scalingo-tables", version, about, long_about = None)]
struct Args {
    /// Table to query (see --list-tables)
    table: Option<String>,

    /// Key-column qualifier, e.g. --qual app_name=my-app (repeatable)
    #[arg(short, long, value_name = "KEY=VALUE")]
    qual: Vec<String>,

    /// Stop after roughly this many rows
    #[arg(short, long)]
    limit: Option<i64>,

    /// Run the table's get operation instead of list
    #[arg(long)]
    get: bool,

    /// Path to the connection configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the available tables and exit
    #[arg(long)]
    list_tables: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .expect("Failed to open log file");

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("scalingo-tables started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir
            .join("scalingo-tables")
            .join("scalingo-tables.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".scalingo-tables").join("scalingo-tables.log");
    }
    PathBuf::from("scalingo-tables.log")
}

/// Sink printing each row as one JSON line on stdout
struct JsonLinesSink;

impl RowSink for JsonLinesSink {
    fn push_row(&self, row: Value) {
        println!("{row}");
    }
}

fn parse_qual(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("Invalid qualifier '{raw}', expected KEY=VALUE"))?;
    Ok((key.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let plugin = plugin();
    tracing::debug!(
        plugin = plugin.name,
        tables = plugin.table_names().len(),
        "Table registry initialized"
    );

    if args.list_tables {
        for name in plugin.table_names() {
            let table = plugin.table(name).expect("registered table");
            println!("{name}: {}", table.description);
        }
        return Ok(());
    }

    let Some(table_name) = args.table else {
        anyhow::bail!("Name a table to query, or pass --list-tables");
    };

    let mut quals = HashMap::new();
    for raw in &args.qual {
        let (key, value) = parse_qual(raw)?;
        quals.insert(key, value);
    }

    let connection = Arc::new(ConnectionConfig::load(args.config.as_deref())?);
    let cache = Arc::new(ConnectionCache::default());
    let sink = Arc::new(JsonLinesSink);

    let options = ScanOptions {
        quals,
        limit: args.limit,
        cancel: None,
    };

    let result = if args.get {
        scan_get(&plugin, &table_name, options, connection, cache, sink).await
    } else {
        scan_list(&plugin, &table_name, options, connection, cache, sink).await
    };

    if let Err(err) = result {
        tracing::error!("Query failed: {err:?}");
        eprintln!("Error: {}", format_api_error(&err));
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_qual() {
        assert_eq!(
            parse_qual("app_name=my-app").unwrap(),
            ("app_name".to_string(), "my-app".to_string())
        );
        assert_eq!(
            parse_qual("k=v=w").unwrap(),
            ("k".to_string(), "v=w".to_string())
        );
        assert!(parse_qual("no-separator").is_err());
    }
}
