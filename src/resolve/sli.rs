/// Latency buckets as `(inclusive upper bound in ms, label)`, ascending.
pub const SLI_THRESHOLDS: &[(u64, &str)] = &[
    (100, "100ms"),
    (250, "250ms"),
    (500, "500ms"),
    (1_000, "1s"),
    (2_500, "2.5s"),
    (5_000, "5s"),
    (10_000, "10s"),
    (30_000, "30s"),
    (60_000, "1min"),
    (300_000, "5min"),
    (600_000, "10min"),
    (1_800_000, "OVER_30min"),
];

/// `observed_sli:<label>` tag for an elapsed time, using [`SLI_THRESHOLDS`].
pub fn resolve_observed_sli_tag(elapsed_ms: u64) -> String {
    resolve_observed_sli_tag_with(elapsed_ms, SLI_THRESHOLDS)
}

/// `observed_sli:<label>` tag for an elapsed time and an ascending table.
///
/// The label reported is the one of the last bound the time exceeded, so a
/// time just past a bound reports that bound's label. Times at or under the
/// lowest bound report the lowest label; times past every bound report the
/// highest. An empty table yields an empty label.
pub fn resolve_observed_sli_tag_with(elapsed_ms: u64, table: &[(u64, &str)]) -> String {
    let mut label = table.first().map(|(_, label)| *label).unwrap_or_default();

    for &(upper_bound, bucket) in table {
        if elapsed_ms <= upper_bound {
            break;
        }
        label = bucket;
    }

    format!("observed_sli:{label}")
}
