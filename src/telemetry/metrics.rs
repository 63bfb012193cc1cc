//! Prometheus metrics

use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Settlement estimate computation
    Estimate,
    /// Balance lookup round trip
    BalanceLookup,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Latest settlement estimate
    SettlementEstimate,
    /// Discovery-phase median market cap
    DiscoveryMedian,
    /// Bets across all breakpoints
    TotalBets,
    /// Current launch phase (0 discovery, 1 predict, 2 settled)
    Phase,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Discovery votes accepted
    VotesSubmitted,
    /// Bets accepted
    BetsPlaced,
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = match metric {
        LatencyMetric::Estimate => "oracle_estimate_latency_ms",
        LatencyMetric::BalanceLookup => "oracle_balance_lookup_latency_ms",
    };

    ::metrics::histogram!(metric_name).record(duration.as_secs_f64() * 1000.0);
    tracing::trace!(
        metric = metric_name,
        value_ms = duration.as_millis(),
        "Recording latency"
    );
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = match metric {
        GaugeMetric::SettlementEstimate => "oracle_settlement_estimate",
        GaugeMetric::DiscoveryMedian => "oracle_discovery_median",
        GaugeMetric::TotalBets => "oracle_total_bets",
        GaugeMetric::Phase => "oracle_phase",
    };

    ::metrics::gauge!(metric_name).set(value);
    tracing::trace!(metric = metric_name, value = value, "Setting gauge");
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    let metric_name = match metric {
        CounterMetric::VotesSubmitted => "oracle_votes_submitted_total",
        CounterMetric::BetsPlaced => "oracle_bets_placed_total",
    };

    ::metrics::counter!(metric_name).increment(1);
}

/// Count a balance lookup by provider and outcome
pub fn record_balance_lookup(provider: &str, outcome: &'static str) {
    ::metrics::counter!(
        "oracle_balance_lookups_total",
        "provider" => provider.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}
