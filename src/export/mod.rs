//! Dataset export, topology rendering and run summaries.

pub mod csv_sink;
pub mod dot;
pub mod record;
pub mod report;

pub use csv_sink::{CsvSink, MemorySink, RecordSink};
pub use dot::{generate_dot, DotRenderer, NullRenderer, TopologyRenderer};
pub use record::{RecordInputs, TrustRecord, HEADER};
pub use report::{generate_json_summary, generate_text_summary, print_summary, RunSummary};
