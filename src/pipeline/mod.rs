mod config;
mod handoff;
mod runner;
mod trace;

pub use config::PipelineConfig;
pub use handoff::{build_handoff, write_handoff_file, HandoffFile, PhaseRecord};
pub use runner::GlocalPipeline;
pub use trace::TraceWriter;
