mod bind;
mod column_spec;
mod expression;
mod options;
mod table_ref;
mod util;
mod value;
mod where_clause;
mod writer;

pub use ::anyhow::Context;
pub use bind::*;
pub use column_spec::*;
pub use expression::*;
pub use options::*;
pub use table_ref::*;
pub use util::*;
pub use value::*;
pub use where_clause::*;
pub use writer::*;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
