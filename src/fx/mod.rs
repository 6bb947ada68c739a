pub mod effects;
pub mod history;
pub mod processor;
pub mod registry;

pub use history::RingHistory;
pub use processor::{Effect, Processor, ProcessorConfig};
pub use registry::{Entry, Registry};

/// One audio amplitude, carried in 32-bit full-scale units.
pub type Sample = f64;

/// Largest positive amplitude representable at the 32-bit integer boundary.
pub const FULL_SCALE: Sample = i32::MAX as Sample;
