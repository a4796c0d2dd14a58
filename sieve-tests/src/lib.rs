mod binds;
mod fixtures;
mod injection;
mod statements;

pub use fixtures::*;

use binds::binds;
use injection::injection;
use log::LevelFilter;
use sieve_core::QueryGenerator;
use statements::statements;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Checks every generator must pass regardless of the dialect.
pub fn execute_tests(generator: &dyn QueryGenerator) {
    statements(generator);
    binds(generator);
    injection(generator);
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
