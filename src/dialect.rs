use sieve_core::{Error, GeneratorOptions, QueryGenerator, Result};
use sieve_mssql::MssqlQueryGenerator;
use sieve_mysql::MySqlQueryGenerator;
use sieve_postgres::PostgresQueryGenerator;
use sieve_sqlite::SqliteQueryGenerator;
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Postgres,
    MySql,
    Sqlite,
    Mssql,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::Postgres,
        Dialect::MySql,
        Dialect::Sqlite,
        Dialect::Mssql,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
            Dialect::Sqlite => "sqlite",
            Dialect::Mssql => "mssql",
        }
    }

    /// Generator rendering this dialect.
    pub fn query_generator(&self, options: GeneratorOptions) -> Box<dyn QueryGenerator> {
        match self {
            Dialect::Postgres => Box::new(PostgresQueryGenerator::new(options)),
            Dialect::MySql => Box::new(MySqlQueryGenerator::new(options)),
            Dialect::Sqlite => Box::new(SqliteQueryGenerator::new(options)),
            Dialect::Mssql => Box::new(MssqlQueryGenerator::new(options)),
        }
    }
}

impl Display for Dialect {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "sqlite" => Ok(Dialect::Sqlite),
            "mssql" | "sqlserver" => Ok(Dialect::Mssql),
            _ => Err(Error::msg(format!("Unknown dialect `{s}`"))),
        }
    }
}
