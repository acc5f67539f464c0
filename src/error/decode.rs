use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Failed to read record at line {line}: {source}")]
    Io {
        line: u64,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed JSON record at line {line}: {source}")]
    InvalidJson {
        line: u64,
        #[source]
        source: serde_json::Error,
    },
    #[error("Malformed CSV record at line {line}: expected 5 or 6 columns, found {found}.")]
    CsvColumnCount { line: u64, found: usize },
    #[error("Malformed CSV record at line {line}: invalid {field} '{value}'.")]
    InvalidCsvField {
        line: u64,
        field: &'static str,
        value: String,
    },
    #[error("Malformed CSV record at line {line}: unterminated quoted error field.")]
    UnterminatedCsvQuote { line: u64 },
    #[error("Record at line {line} is not valid UTF-8.")]
    InvalidUtf8 { line: u64 },
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
