use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Bad buckets: '{value}'. Expected a bracketed list such as [0,100ms,1s].")]
    InvalidBuckets { value: String },
    #[error("Bad buckets: '{value}': {source}")]
    InvalidBucketDuration {
        value: String,
        #[source]
        source: Box<ValidationError>,
    },
    #[error("Bad buckets: '{value}'. Boundaries must be strictly increasing.")]
    BucketsNotIncreasing { value: String },
    #[error("Unsupported reporter '{value}'. Use text, json, plot, or hist[buckets].")]
    UnsupportedReporter { value: String },
    #[error("Unsupported dumper '{value}'. Use json or csv.")]
    UnsupportedDumper { value: String },
    #[error("Invalid status range '{value}'. Expected format start-end (e.g., 200-399).")]
    InvalidStatusRange { value: String },
    #[error("Invalid status range '{value}': {source}")]
    InvalidStatusNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Status range start must be <= end.")]
    StatusRangeStartAfterEnd,
    #[error("At least one input is required.")]
    MissingInputs,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
