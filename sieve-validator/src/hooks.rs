use crate::{Record, ValidateOptions};
use futures::future::{self, BoxFuture};
use sieve_core::{Error, Result};

/// Lifecycle callbacks run around a validation pass when `ValidateOptions::hooks` is set.
///
/// Every method has a no-op default. An error returned by any hook aborts the pass and
/// reaches the caller unchanged.
pub trait ValidationHooks: Send + Sync {
    fn before_validate<'a>(
        &'a self,
        _record: &'a Record,
        _options: &'a ValidateOptions,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(future::ready(Ok(())))
    }

    /// Runs after a failed pass. Returning `Some` replaces the error handed to the caller.
    fn validation_failed<'a>(
        &'a self,
        _record: &'a Record,
        _options: &'a ValidateOptions,
        _error: &'a Error,
    ) -> BoxFuture<'a, Result<Option<Error>>> {
        Box::pin(future::ready(Ok(None)))
    }

    fn after_validate<'a>(
        &'a self,
        _record: &'a Record,
        _options: &'a ValidateOptions,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(future::ready(Ok(())))
    }
}
