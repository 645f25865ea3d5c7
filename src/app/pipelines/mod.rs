pub mod spec_pipeline;

pub use spec_pipeline::SpecPipeline;
