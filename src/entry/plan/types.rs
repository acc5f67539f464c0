use crate::dump::DumperKind;
use crate::record::RecordFormat;
use crate::report::{ReportSettings, ReporterKind};
use crate::streams::SourceEofPolicy;

/// Where records come from and where output goes.
pub(in crate::entry) struct StreamPlan {
    pub(super) inputs: Vec<String>,
    pub(super) output: String,
    pub(super) format: RecordFormat,
    pub(super) on_source_eof: SourceEofPolicy,
}

pub(in crate::entry) enum RunPlan {
    Report {
        reporter: ReporterKind,
        settings: ReportSettings,
        streams: StreamPlan,
    },
    Dump {
        dumper: DumperKind,
        streams: StreamPlan,
    },
}
