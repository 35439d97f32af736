use crate::types::{ConnCounter, ConnState, RemoteEndpoint};
use std::collections::HashMap;

/// Occurrence counters for one scan pass, keyed by `"{addr}_{port}_{state}"`.
///
/// Write-once-per-pass: entries are only ever inserted or incremented, then
/// read out at the end with [`into_counters`](ConnAggregator::into_counters).
/// Not meant to be shared across passes.
#[derive(Debug, Default)]
pub struct ConnAggregator {
    counters: HashMap<String, ConnCounter>,
}

impl ConnAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one observation of `(endpoint, state)`.
    pub fn record(&mut self, endpoint: RemoteEndpoint, state: ConnState) {
        let key = counter_key(&endpoint, state);
        self.counters
            .entry(key)
            .and_modify(|c| c.count += 1)
            .or_insert(ConnCounter {
                endpoint,
                state,
                count: 1,
            });
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn into_counters(self) -> HashMap<String, ConnCounter> {
        self.counters
    }
}

fn counter_key(endpoint: &RemoteEndpoint, state: ConnState) -> String {
    format!("{}_{}_{}", endpoint.addr, endpoint.port, state.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ep(addr: &str, port: u16) -> RemoteEndpoint {
        RemoteEndpoint {
            addr: addr.into(),
            port,
        }
    }

    #[test]
    fn first_observation_inserts_with_count_one() {
        let mut agg = ConnAggregator::new();
        agg.record(ep("10.0.0.2", 443), ConnState::Established);
        let counters = agg.into_counters();
        let c = &counters["10.0.0.2_443_TCP_ESTABLISHED"];
        assert_eq!(c.count, 1);
        assert_eq!(c.endpoint.port, 443);
    }

    #[test]
    fn repeat_observations_increment() {
        let mut agg = ConnAggregator::new();
        for _ in 0..3 {
            agg.record(ep("10.0.0.2", 443), ConnState::TimeWait);
        }
        let counters = agg.into_counters();
        assert_eq!(counters.len(), 1);
        assert_eq!(counters["10.0.0.2_443_TCP_TIME_WAIT"].count, 3);
    }

    #[test]
    fn distinct_states_keep_distinct_keys() {
        let mut agg = ConnAggregator::new();
        agg.record(ep("10.0.0.2", 443), ConnState::Established);
        agg.record(ep("10.0.0.2", 443), ConnState::TimeWait);
        assert_eq!(agg.into_counters().len(), 2);
    }
}
