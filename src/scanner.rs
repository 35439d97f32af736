// Pure proc net table scanning — string in, counters out, no I/O.
use crate::aggregate::ConnAggregator;
use crate::decode::{self, MalformedToken};
use crate::types::{ConnCounter, ConnState};
use log::{debug, warn};
use std::collections::HashMap;

/// Which proc net table a text blob came from. Selects the address token
/// width and the decoding variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrFamily {
    V4,
    V6,
}

impl AddrFamily {
    /// Width of one `HEXADDR:HEXPORT` token in this table: 8 or 32 hex
    /// digits plus `:` plus 4 port digits.
    fn token_len(self) -> usize {
        match self {
            AddrFamily::V4 => 13,
            AddrFamily::V6 => 37,
        }
    }
}

/// One token the scanner gave up on, with the decode failure that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedToken {
    pub line_no: usize,
    pub error: MalformedToken,
}

/// Result of one aggregation pass over a table text.
#[derive(Debug, Default)]
pub struct TableScan {
    pub counters: HashMap<String, ConnCounter>,
    pub skipped: Vec<SkippedToken>,
}

/// Scan the full text of a `tcp` or `tcp6` table and aggregate remote
/// endpoints by (address, port, state).
///
/// The local/remote address columns are located by token length, not by
/// column index: the surrounding variable-width fields shift positions
/// across kernel versions, but an address pair is always two adjacent
/// columns of the family's exact token width. Do not replace this with
/// fixed-index access.
///
/// A token that fails to decode is logged, recorded in `skipped`, and the
/// scan continues with the rest of the table. Header lines, blank lines,
/// and truncated trailers match no length predicate and contribute nothing.
pub fn scan_table(text: &str, family: AddrFamily) -> TableScan {
    let mut agg = ConnAggregator::new();
    let mut skipped = Vec::new();
    let want = family.token_len();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let columns: Vec<&str> = line.split_whitespace().collect();
        for i in 1..columns.len() {
            if columns[i].len() != want || columns[i - 1].len() != want {
                continue;
            }
            match family {
                AddrFamily::V4 => {
                    // State is the column right after the address pair.
                    let state = columns
                        .get(i + 1)
                        .map(|c| ConnState::from_code(c))
                        .unwrap_or(ConnState::Unknown);
                    match decode::decode_endpoint_v4(columns[i]) {
                        Ok(remote) => agg.record(remote, state),
                        Err(error) => {
                            warn!("line {line_no}: skipping remote address: {error}");
                            skipped.push(SkippedToken { line_no, error });
                        }
                    }
                }
                AddrFamily::V6 => {
                    let remote = match decode::decode_endpoint_v6(columns[i]) {
                        Ok(remote) => remote,
                        Err(error) => {
                            warn!("line {line_no}: skipping remote address: {error}");
                            skipped.push(SkippedToken { line_no, error });
                            continue;
                        }
                    };
                    // The local endpoint is decoded but only surfaces as a
                    // diagnostic; a corrupt local token still skips the
                    // whole record.
                    let local = match decode::decode_endpoint_v6(columns[i - 1]) {
                        Ok(local) => local,
                        Err(error) => {
                            warn!("line {line_no}: skipping local address: {error}");
                            skipped.push(SkippedToken { line_no, error });
                            continue;
                        }
                    };
                    debug!("line {line_no}: remote {remote} local {local}");
                    agg.record(remote, ConnState::Unknown);
                }
            }
        }
    }

    TableScan {
        counters: agg.into_counters(),
        skipped,
    }
}
