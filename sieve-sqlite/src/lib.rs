mod query_generator;

pub use query_generator::*;
