mod config;
mod dialect;

pub use config::*;
pub use dialect::*;
pub use sieve_core::*;
pub use sieve_mssql::*;
pub use sieve_mysql::*;
pub use sieve_postgres::*;
pub use sieve_sqlite::*;
pub use sieve_validator::*;
