use crate::dump::run_dump;
use crate::error::AppResult;
use crate::record::Decoder;
use crate::report::run_report;
use crate::streams::{BoxedSink, RoundRobinReader, open_inputs, open_output};

use super::types::{RunPlan, StreamPlan};

pub(in crate::entry) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    match plan {
        RunPlan::Report {
            reporter,
            settings,
            streams,
        } => {
            tracing::debug!(
                "Reporting {} from {} input(s) every {:?}",
                reporter,
                streams.inputs.len(),
                settings.window.window
            );
            let (mut decoder, mut output) = open_streams(&streams).await?;
            let summary = run_report(reporter, &settings, &mut decoder, &mut output).await?;
            tracing::debug!(
                "Read {} records in {} lines",
                summary.records,
                decoder.lines_read()
            );
            Ok(())
        }
        RunPlan::Dump { dumper, streams } => {
            let (mut decoder, mut output) = open_streams(&streams).await?;
            let written = run_dump(dumper, &mut decoder, &mut output).await?;
            tracing::debug!("Dumped {} of {} lines", written, decoder.lines_read());
            Ok(())
        }
    }
}

/// Opens every input before the output, so a missing input never truncates
/// an existing output file.
async fn open_streams(streams: &StreamPlan) -> AppResult<(Decoder<RoundRobinReader>, BoxedSink)> {
    let sources = open_inputs(&streams.inputs).await?;
    let output = open_output(&streams.output).await?;
    let reader = RoundRobinReader::new(sources, streams.on_source_eof);
    Ok((Decoder::new(reader, streams.format), output))
}
