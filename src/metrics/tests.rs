use std::time::Duration;

use super::*;
use crate::error::{AppError, AppResult, ValidationError};
use crate::record::Record;
use crate::record::test_support::record_at;

const fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn with_latency(latency_ms: u64) -> AppResult<Record> {
    record_at(0, 200, latency_ms, "")
}

#[test]
fn histogram_counts_reference_scenario() -> AppResult<()> {
    let buckets: Buckets = "[0,100ms,200ms]".parse()?;
    let mut histogram = BucketHistogram::new(buckets);
    for latency in [50, 150, 250, 90] {
        histogram.update(&with_latency(latency)?);
    }
    if histogram.counts() != [2, 1, 1] || histogram.total() != 4 {
        return Err(AppError::metrics(format!(
            "Unexpected counts {:?} total {}",
            histogram.counts(),
            histogram.total()
        )));
    }
    Ok(())
}

#[test]
fn boundary_latency_lands_in_bucket_starting_there() -> AppResult<()> {
    let buckets: Buckets = "[0, 100ms, 200ms]".parse()?;
    for (latency, expected) in [(0, 0), (100, 1), (200, 2), (99, 0), (5_000, 2)] {
        let idx = buckets.classify(ms(latency));
        if idx != expected {
            return Err(AppError::metrics(format!(
                "{}ms classified into {}, expected {}",
                latency, idx, expected
            )));
        }
    }
    Ok(())
}

#[test]
fn latency_below_first_boundary_uses_first_bucket() -> AppResult<()> {
    let buckets: Buckets = "[10ms,20ms]".parse()?;
    if buckets.classify(ms(1)) == 0 {
        Ok(())
    } else {
        Err(AppError::metrics("Expected bucket 0"))
    }
}

#[test]
fn every_latency_lands_in_exactly_one_bucket() -> AppResult<()> {
    let literals = ["[0]", "[0,1ms]", "[0,100ms,200ms,500ms]", "[5ms,1s,1m]"];
    for literal in literals {
        let buckets: Buckets = literal.parse()?;
        let mut histogram = BucketHistogram::new(buckets.clone());
        for latency in (0..2_000).step_by(7) {
            let idx = buckets.classify(ms(latency));
            if idx >= buckets.len() {
                return Err(AppError::metrics(format!("{} out of range for {}", idx, literal)));
            }
            histogram.update(&with_latency(latency)?);
            let sum: u64 = histogram.counts().iter().sum();
            if sum != histogram.total() {
                return Err(AppError::metrics(format!(
                    "sum {} != total {} for {}",
                    sum,
                    histogram.total(),
                    literal
                )));
            }
        }
    }
    Ok(())
}

#[test]
fn describe_renders_open_last_bucket() -> AppResult<()> {
    let buckets: Buckets = "[0,100ms,1.5s]".parse()?;
    let first = buckets.describe(0);
    let last = buckets.describe(2);
    if first != Some(("0s".to_owned(), "100ms".to_owned())) {
        return Err(AppError::metrics(format!("Unexpected first: {:?}", first)));
    }
    if last != Some(("1.5s".to_owned(), "+Inf".to_owned())) {
        return Err(AppError::metrics(format!("Unexpected last: {:?}", last)));
    }
    if buckets.describe(3).is_some() {
        return Err(AppError::metrics("Expected no bucket 3"));
    }
    Ok(())
}

#[test]
fn invalid_bucket_bounds_are_rejected() -> AppResult<()> {
    for literal in ["", "[]", "[ ]", "0,1s", "[0,1s", "[abc]", "[0,,1s]", "[1x]"] {
        match literal.parse::<Buckets>() {
            Err(
                ValidationError::InvalidBuckets { .. }
                | ValidationError::InvalidBucketDuration { .. },
            ) => {}
            other => {
                return Err(AppError::metrics(format!(
                    "Expected rejection of '{}', got {:?}",
                    literal, other
                )));
            }
        }
    }
    for literal in ["[1s,500ms]", "[0,100ms,100ms]"] {
        if !matches!(
            literal.parse::<Buckets>(),
            Err(ValidationError::BucketsNotIncreasing { .. })
        ) {
            return Err(AppError::metrics(format!("Expected ordering error for {}", literal)));
        }
    }
    Ok(())
}

#[test]
fn metrics_reference_scenario() -> AppResult<()> {
    let mut metrics = MetricsAccumulator::new(QuantileMode::Exact, StatusRange::default())?;
    for (code, error) in [(200, ""), (200, ""), (500, "boom")] {
        metrics.update(&record_at(0, code, 10, error)?);
    }
    let view = metrics.snapshot();
    if view.success_x100 != 6_666 {
        return Err(AppError::metrics(format!("Unexpected success {}", view.success)));
    }
    let expected_codes: std::collections::BTreeMap<u16, u64> =
        [(200, 2), (500, 1)].into_iter().collect();
    if view.status_codes != expected_codes {
        return Err(AppError::metrics(format!("Unexpected codes {:?}", view.status_codes)));
    }
    if view.errors != vec!["boom".to_owned()] {
        return Err(AppError::metrics(format!("Unexpected errors {:?}", view.errors)));
    }
    Ok(())
}

#[test]
fn success_ratio_counts_records_without_errors() -> AppResult<()> {
    let mut metrics = MetricsAccumulator::new(QuantileMode::Exact, StatusRange::default())?;
    let errors = ["", "timeout", "", "", "reset", "", "timeout"];
    for (idx, error) in errors.iter().enumerate() {
        let offset = u64::try_from(idx).map_err(|_err| AppError::metrics("bad index"))?;
        metrics.update(&record_at(offset, 200, 1, error)?);
    }
    let view = metrics.snapshot();
    if view.success_x100 != 5_714 {
        return Err(AppError::metrics(format!("Unexpected success {}", view.success)));
    }
    if view.errors != vec!["timeout".to_owned(), "reset".to_owned()] {
        return Err(AppError::metrics(format!("Unexpected errors {:?}", view.errors)));
    }
    Ok(())
}

#[test]
fn status_outside_success_range_is_not_success() -> AppResult<()> {
    let range: StatusRange = "200-299".parse()?;
    let mut metrics = MetricsAccumulator::new(QuantileMode::Exact, range)?;
    metrics.update(&record_at(0, 204, 1, "")?);
    metrics.update(&record_at(1, 302, 1, "")?);
    let view = metrics.snapshot();
    if view.success_x100 != 5_000 {
        return Err(AppError::metrics(format!("Unexpected success {}", view.success)));
    }
    Ok(())
}

#[test]
fn duration_wait_and_rates_follow_record_timestamps() -> AppResult<()> {
    let mut metrics = MetricsAccumulator::new(QuantileMode::Exact, StatusRange::default())?;
    metrics.update(&record_at(0, 200, 100, "")?);
    metrics.update(&record_at(1_000, 200, 300, "")?);
    metrics.update(&record_at(2_000, 500, 500, "")?);
    let view = metrics.snapshot();

    if view.duration != ms(2_000) || view.wait != ms(500) {
        return Err(AppError::metrics(format!(
            "Unexpected duration {:?} wait {:?}",
            view.duration, view.wait
        )));
    }
    if view.rate_x100 != 150 {
        return Err(AppError::metrics(format!("Unexpected rate {}", view.rate)));
    }
    if view.throughput_x100 != 80 {
        return Err(AppError::metrics(format!("Unexpected throughput {}", view.throughput)));
    }
    if view.latencies.mean != ms(300)
        || view.latencies.min != ms(100)
        || view.latencies.max != ms(500)
        || view.latencies.total != ms(900)
    {
        return Err(AppError::metrics(format!("Unexpected latencies {:?}", view.latencies)));
    }
    if view.bytes_in.total != 300 || view.bytes_out.mean_x100 != 1_000 {
        return Err(AppError::metrics("Unexpected byte metrics"));
    }
    Ok(())
}

#[test]
fn snapshots_interleave_with_updates_without_mutation() -> AppResult<()> {
    let mut metrics = MetricsAccumulator::new(QuantileMode::Exact, StatusRange::default())?;
    metrics.update(&with_latency(10)?);
    let first = metrics.snapshot();
    let again = metrics.snapshot();
    if first != again || first.requests != 1 {
        return Err(AppError::metrics("Snapshot changed accumulator state"));
    }
    metrics.update(&with_latency(30)?);
    let second = metrics.snapshot();
    if second.requests != 2 || second.latencies.max != ms(30) {
        return Err(AppError::metrics(format!("Unexpected second snapshot {:?}", second)));
    }
    Ok(())
}

#[test]
fn empty_snapshot_is_zeroed() -> AppResult<()> {
    let metrics = MetricsAccumulator::new(QuantileMode::Hdr, StatusRange::default())?;
    let view = metrics.snapshot();
    if view.requests == 0 && view.success_x100 == 0 && view.latencies.p99 == Duration::ZERO {
        Ok(())
    } else {
        Err(AppError::metrics(format!("Unexpected empty view {:?}", view)))
    }
}

#[test]
fn exact_percentiles_use_nearest_rank() -> AppResult<()> {
    let mut metrics = MetricsAccumulator::new(QuantileMode::Exact, StatusRange::default())?;
    for latency in (1..=100).rev() {
        metrics.update(&with_latency(latency)?);
    }
    let latencies = metrics.snapshot().latencies;
    let expected = [(latencies.p50, 51), (latencies.p90, 90), (latencies.p95, 95), (latencies.p99, 99)];
    for (actual, expected_ms) in expected {
        if actual != ms(expected_ms) {
            return Err(AppError::metrics(format!(
                "Expected {}ms, got {:?}",
                expected_ms, actual
            )));
        }
    }
    Ok(())
}

#[test]
fn hdr_percentiles_stay_within_precision() -> AppResult<()> {
    let mut metrics = MetricsAccumulator::new(QuantileMode::Hdr, StatusRange::default())?;
    for latency in 1..=1_000 {
        metrics.update(&with_latency(latency)?);
    }
    let p99 = metrics.snapshot().latencies.p99.as_nanos();
    // Three significant digits keep the value within half a percent.
    if p99.abs_diff(990_000_000) <= 4_950_000 {
        Ok(())
    } else {
        Err(AppError::metrics(format!("Unexpected hdr p99 {}", p99)))
    }
}

#[test]
fn status_range_parsing() -> AppResult<()> {
    let single: StatusRange = "204".parse()?;
    if single.0 != (204..=204) {
        return Err(AppError::metrics("Expected single-code range"));
    }
    if !matches!(
        "399-200".parse::<StatusRange>(),
        Err(ValidationError::StatusRangeStartAfterEnd)
    ) {
        return Err(AppError::metrics("Expected start-after-end error"));
    }
    if !matches!(
        "2xx".parse::<StatusRange>(),
        Err(ValidationError::InvalidStatusNumber { .. })
    ) {
        return Err(AppError::metrics("Expected number error"));
    }
    Ok(())
}
