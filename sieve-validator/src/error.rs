use crate::{Record, ValidatorArg};
use sieve_core::{Error, Result, Value};
use std::{
    fmt::{self, Display, Formatter},
    sync::{Arc, Mutex, PoisonError},
};

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    NotNullViolation,
    StringViolation,
    UniqueViolation,
    ValidationError,
}

impl ValidationErrorKind {
    pub fn origin(&self) -> ErrorOrigin {
        match self {
            Self::NotNullViolation | Self::StringViolation => ErrorOrigin::Core,
            Self::UniqueViolation => ErrorOrigin::Db,
            Self::ValidationError => ErrorOrigin::Function,
        }
    }
}

impl Display for ValidationErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotNullViolation => "notNull violation",
            Self::StringViolation => "string violation",
            Self::UniqueViolation => "unique violation",
            Self::ValidationError => "Validation error",
        })
    }
}

/// Where a failure was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorOrigin {
    /// Schema checks (nullability, value shape).
    Core,
    /// Built-in or user supplied validators.
    Function,
    /// Constraints reported by the database.
    Db,
}

impl Display for ErrorOrigin {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Core => "CORE",
            Self::Function => "FUNCTION",
            Self::Db => "DB",
        })
    }
}

/// One failure found while validating a record.
///
/// Built once through [`ValidationErrorItem::new`] and the `with_*` methods, read only afterwards.
#[derive(Debug)]
pub struct ValidationErrorItem {
    message: String,
    kind: ValidationErrorKind,
    path: String,
    value: Option<Value>,
    instance: Arc<Record>,
    origin: ErrorOrigin,
    validator_key: String,
    validator_name: Option<String>,
    validator_args: Vec<ValidatorArg>,
    original: Option<Error>,
}

impl ValidationErrorItem {
    pub fn new(
        message: impl Into<String>,
        kind: ValidationErrorKind,
        path: impl Into<String>,
        value: Option<Value>,
        instance: Arc<Record>,
        validator_key: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            kind,
            path: path.into(),
            value,
            instance,
            origin: kind.origin(),
            validator_key: validator_key.into(),
            validator_name: None,
            validator_args: Vec::new(),
            original: None,
        }
    }

    /// Built-in validator that failed and the arguments it ran with.
    pub fn with_validator(mut self, name: impl Into<String>, args: Vec<ValidatorArg>) -> Self {
        self.validator_name = Some(name.into());
        self.validator_args = args;
        self
    }

    /// Error raised by the validator itself.
    pub fn with_original(mut self, error: Error) -> Self {
        self.original = Some(error);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ValidationErrorKind {
        self.kind
    }

    /// Attribute name, or the model level validator name.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn instance(&self) -> &Arc<Record> {
        &self.instance
    }

    pub fn origin(&self) -> ErrorOrigin {
        self.origin
    }

    pub fn validator_key(&self) -> &str {
        &self.validator_key
    }

    /// Set only for built-in validators.
    pub fn validator_name(&self) -> Option<&str> {
        self.validator_name.as_deref()
    }

    pub fn validator_args(&self) -> &[ValidatorArg] {
        &self.validator_args
    }

    pub fn original(&self) -> Option<&Error> {
        self.original.as_ref()
    }

    /// Key identifying the validator that failed, optionally namespaced by the origin (`function.len`).
    pub fn get_validator_key(&self, use_type_as_ns: bool, separator: &str) -> Result<String> {
        if use_type_as_ns && separator.is_empty() {
            return Err(Error::msg(
                "Invalid namespace separator given, must be a non-empty string",
            ));
        }
        let key = if self.validator_key.is_empty() {
            self.validator_name.as_deref().unwrap_or_default()
        } else {
            &self.validator_key
        };
        if key.is_empty() {
            return Ok(String::new());
        }
        let result = if use_type_as_ns {
            format!("{}{}{}", self.origin, separator, key)
        } else {
            key.to_string()
        };
        Ok(result.to_lowercase().trim().to_string())
    }
}

impl Display for ValidationErrorItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Items collected during a single pass, in completion order.
#[derive(Debug, Default)]
pub struct ErrorAggregate {
    items: Mutex<Vec<ValidationErrorItem>>,
}

impl ErrorAggregate {
    pub fn push(&self, item: ValidationErrorItem) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(item);
    }
    pub fn len(&self) -> usize {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn into_inner(self) -> Vec<ValidationErrorItem> {
        self.items
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Every failure of a validation pass.
#[derive(Debug)]
pub struct ValidationError {
    pub errors: Vec<ValidationErrorItem>,
}

impl ValidationError {
    /// Items reported for `path`.
    pub fn get(&self, path: &str) -> Vec<&ValidationErrorItem> {
        self.errors.iter().filter(|v| v.path == path).collect()
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("Validation error");
        }
        for (i, item) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(",\n")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Returned when `validate` is called again on a validator whose pass is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationInProgress;

impl Display for ValidationInProgress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Validations already in progress")
    }
}

impl std::error::Error for ValidationInProgress {}
