use std::collections::HashMap;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use time::{format_description::well_known, OffsetDateTime};

use fd_explorer_rs::types::ConnCounter;
use fd_explorer_rs::{fdinfo, pinger::Pinger, summary};

/// fd-explorer-rs — summarize a process's TCP remote endpoints from the proc
/// net tables, optionally while load-testing a URL with concurrent workers.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fd-explorer-rs",
    version,
    about = "Per-process TCP connection summarizer with a concurrent HTTP load pinger.",
    long_about = None
)]
struct Cli {
    /// Remote URL to ping from concurrent workers. If omitted, run one
    /// summary pass and exit.
    #[arg(long, short = 'r')]
    remote: Option<String>,

    /// Process id to inspect. Defaults to this process.
    #[arg(long)]
    pid: Option<u32>,

    /// Number of concurrent pinger workers.
    #[arg(long, default_value_t = 20)]
    workers: usize,

    /// Max pooled connections per host for the pinger client.
    #[arg(long = "max-conns", default_value_t = 10)]
    max_conns: usize,

    /// Per-request timeout in milliseconds.
    #[arg(long = "timeout-ms", default_value_t = 5000)]
    timeout_ms: u64,

    /// Seconds between connection summary passes.
    #[arg(long = "summary-interval-secs", default_value_t = 30)]
    summary_interval_secs: u64,

    /// Seconds between pinger counter reports.
    #[arg(long = "report-interval-secs", default_value_t = 20)]
    report_interval_secs: u64,

    /// Write the latest summary as pretty JSON to this path (optional).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also dump the process's /proc/<pid>/fdinfo entries before scanning.
    #[arg(long = "show-fds", default_value_t = false)]
    show_fds: bool,
}

/// JSON report shape for `--output`.
#[derive(Debug, Serialize)]
struct SummaryReport<'a> {
    timestamp: String,
    counters: &'a HashMap<String, ConnCounter>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // Resolve the pid once up front; everything below takes it explicitly.
    let pid = cli.pid.unwrap_or_else(std::process::id);

    println!("fd-explorer-rs configuration:");
    println!(
        "  remote       : {}",
        cli.remote.as_deref().unwrap_or("<none, single pass>")
    );
    println!("  pid          : {}", pid);
    println!("  workers      : {}", cli.workers);
    println!("  max_conns    : {}", cli.max_conns);
    println!("  timeout_ms   : {}", cli.timeout_ms);
    println!(
        "  output       : {}",
        cli.output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<none>".to_string())
    );

    if cli.show_fds {
        print_fd_info(pid);
    }

    let Some(remote) = cli.remote.clone() else {
        let counters = summary::summarize_tcp(pid);
        print_summary_table(&counters);
        if let Some(path) = cli.output.as_deref() {
            write_summary_json(path, &counters)?;
            println!("Wrote JSON summary to {}", path.display());
        }
        return Ok(());
    };

    // Periodic summary passes in the background while the pinger runs.
    let summary_interval = Duration::from_secs(cli.summary_interval_secs.max(1));
    let output = cli.output.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(summary_interval);
        loop {
            ticker.tick().await;
            let counters = summary::summarize_tcp(pid);
            print_summary_table(&counters);
            if let Some(path) = output.as_deref() {
                if let Err(e) = write_summary_json(path, &counters) {
                    eprintln!("Failed to write JSON to {}: {}", path.display(), e);
                }
            }
        }
    });

    println!("Calling {remote}");
    let pinger = Pinger::new(
        remote,
        cli.max_conns,
        Duration::from_millis(cli.timeout_ms),
        Duration::from_secs(cli.report_interval_secs.max(1)),
    )?;
    pinger.run(cli.workers).await;
    Ok(())
}

fn print_summary_table(counters: &HashMap<String, ConnCounter>) {
    println!("\nRemote endpoints at {} ({} entries):", now_iso_like(), counters.len());
    let mut rows: Vec<&ConnCounter> = counters.values().collect();
    // HashMap iteration order is arbitrary; sort for stable output.
    rows.sort_by(|a, b| {
        (&a.endpoint.addr, a.endpoint.port, a.state.as_str())
            .cmp(&(&b.endpoint.addr, b.endpoint.port, b.state.as_str()))
    });
    for c in rows {
        println!(
            "[{:>17}] {:>21}\t{}",
            c.state,
            c.endpoint.to_string(),
            c.count
        );
    }
}

fn print_fd_info(pid: u32) {
    match fdinfo::list_fd_info(pid) {
        Ok(entries) => {
            for entry in &entries {
                println!("fdinfo {}:\n{}", entry.name, entry.content);
            }
            println!("--> {} descriptors open", entries.len());
        }
        Err(e) => eprintln!("Warning: failed to list fdinfo: {e}"),
    }
}

fn write_summary_json(path: &std::path::Path, counters: &HashMap<String, ConnCounter>) -> Result<()> {
    let report = SummaryReport {
        timestamp: now_iso_like(),
        counters,
    };
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &report)?;
    Ok(())
}

fn now_iso_like() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}
