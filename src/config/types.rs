use serde::Deserialize;

use crate::metrics::QuantileMode;
use crate::record::RecordFormat;
use crate::report::TailWindow;
use crate::streams::SourceEofPolicy;

/// Contents of `volley.toml` / `volley.json`. Every key is optional and
/// only fills in flags that were not given on the command line.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub window: Option<DurationValue>,
    pub inputs: Option<InputsValue>,
    pub output: Option<String>,
    pub reporter: Option<String>,
    pub dumper: Option<String>,
    pub input_format: Option<RecordFormat>,
    pub final_window: Option<TailWindow>,
    pub on_source_eof: Option<SourceEofPolicy>,
    pub success_status: Option<String>,
    pub quantiles: Option<QuantileMode>,
    pub no_color: Option<bool>,
    pub verbose: Option<bool>,
}

/// A duration given as whole seconds or as a literal such as `"500ms"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

/// Inputs given as one comma separated string or as a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InputsValue {
    Joined(String),
    List(Vec<String>),
}
