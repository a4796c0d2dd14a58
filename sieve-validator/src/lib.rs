mod builtin;
mod error;
mod hooks;
mod instance_validator;
mod model;

pub use builtin::*;
pub use error::*;
pub use hooks::*;
pub use instance_validator::*;
pub use model::*;
