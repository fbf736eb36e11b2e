pub mod pipeline;

pub use pipeline::{DayPipeline, DayResults};
