//! Input/output stream plumbing: file opening and the round-robin fan-in.
mod files;
mod round_robin;


pub use files::{
    BoxedSink, BoxedSource, STDIN, STDOUT, flush_output, open_inputs, open_output, write_chunk,
};
pub use round_robin::{RoundRobinReader, SourceEofPolicy};
