mod context;

pub use context::correlation;
