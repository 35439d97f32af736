use crate::scanner::{self, AddrFamily};
use crate::types::ConnCounter;
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;

/// Aggregate the remote endpoints of `/proc/<pid>/net/tcp` for one process.
///
/// Each call performs a fresh scan pass and returns an independent map; no
/// state is kept between calls. An unreadable table (process gone, no
/// permission) yields an empty map and a diagnostic rather than an error —
/// the only caller-visible distinction is "complete aggregation" versus
/// "empty aggregation".
pub fn summarize_tcp(pid: u32) -> HashMap<String, ConnCounter> {
    summarize(pid, AddrFamily::V4)
}

/// IPv6 variant over `/proc/<pid>/net/tcp6`. Not wired into the demo
/// harness; callers wanting IPv6 aggregation invoke it directly.
pub fn summarize_tcp6(pid: u32) -> HashMap<String, ConnCounter> {
    summarize(pid, AddrFamily::V6)
}

fn summarize(pid: u32, family: AddrFamily) -> HashMap<String, ConnCounter> {
    let table = match family {
        AddrFamily::V4 => "tcp",
        AddrFamily::V6 => "tcp6",
    };
    let path = format!("/proc/{pid}/net/{table}");
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            warn!("failed to read {path}: {e}");
            return HashMap::new();
        }
    };

    let scan = scanner::scan_table(&text, family);
    debug!(
        "{path}: {} entries, {} tokens skipped",
        scan.counters.len(),
        scan.skipped.len()
    );
    scan.counters
}
