mod context;
mod query_generator;

pub use context::*;
pub use query_generator::*;
