use crate::{BuiltinValidator, InstanceValidator, ValidateOptions, ValidationHooks};
use futures::{FutureExt, future::BoxFuture};
use sieve_core::{Error, Result, Row, Value};
use std::{
    fmt::{self, Debug, Display, Formatter},
    future::Future,
    sync::Arc,
};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339, macros,
};
use tokio::sync::oneshot;
use uuid::Uuid;

/// Declared type of an attribute, used for the value shape checks.
#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    String(Option<u32>),
    Text,
    CiText,
    Integer,
    BigInt,
    Float,
    Double,
    Decimal,
    Boolean,
    Date,
    DateOnly,
    Uuid,
    Blob,
    Json,
    Enum(Vec<String>),
}

impl DataType {
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..) | Self::Text | Self::CiText)
    }

    /// Checks that a non null `value` fits this type.
    pub fn validate(&self, value: &Value) -> Result<()> {
        let valid = match self {
            Self::String(..) | Self::Text | Self::CiText => !matches!(value, Value::List(..)),
            Self::Integer | Self::BigInt => match value {
                Value::Int(..) | Value::UInt(..) => true,
                Value::Float(v) => v.fract() == 0.0,
                Value::Decimal(v) => v.fract().is_zero(),
                Value::Varchar(v) => v.trim().parse::<i128>().is_ok(),
                _ => false,
            },
            Self::Float | Self::Double | Self::Decimal => {
                !matches!(value, Value::Boolean(..)) && value.as_f64().is_some()
            }
            Self::Boolean => match value {
                Value::Boolean(..) => true,
                Value::Int(v) => *v == 0 || *v == 1,
                Value::UInt(v) => *v == 0 || *v == 1,
                Value::Varchar(v) => matches!(v.as_str(), "true" | "false" | "1" | "0"),
                _ => false,
            },
            Self::Date | Self::DateOnly => match value {
                Value::Date(..) | Value::Timestamp(..) | Value::TimestampWithTimezone(..) => true,
                Value::Varchar(v) => parse_date(v).is_some(),
                _ => false,
            },
            Self::Uuid => match value {
                Value::Uuid(..) => true,
                Value::Varchar(v) => Uuid::try_parse(v).is_ok(),
                _ => false,
            },
            Self::Blob => matches!(value, Value::Blob(..) | Value::Varchar(..)),
            Self::Json => true,
            Self::Enum(values) => value.as_str().is_some_and(|v| values.iter().any(|e| e == v)),
        };
        if valid {
            Ok(())
        } else if self.is_string() {
            Err(Error::msg("cannot be an array or an object"))
        } else {
            Err(Error::msg(format!("{value} is not a valid {self}")))
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(Some(len)) => write!(f, "string({len})"),
            Self::String(None) => f.write_str("string"),
            Self::Text => f.write_str("text"),
            Self::CiText => f.write_str("citext"),
            Self::Integer => f.write_str("integer"),
            Self::BigInt => f.write_str("bigint"),
            Self::Float => f.write_str("float"),
            Self::Double => f.write_str("double"),
            Self::Decimal => f.write_str("decimal"),
            Self::Boolean => f.write_str("boolean"),
            Self::Date => f.write_str("date"),
            Self::DateOnly => f.write_str("dateonly"),
            Self::Uuid => f.write_str("uuid"),
            Self::Blob => f.write_str("blob"),
            Self::Json => f.write_str("json"),
            Self::Enum(values) => write!(f, "enum({})", values.join(", ")),
        }
    }
}

/// Parses the textual date forms accepted by the date validators. Dates without an offset are UTC.
pub fn parse_date(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();
    if let Ok(v) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(v);
    }
    if let Ok(v) = PrimitiveDateTime::parse(
        value,
        macros::format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    ) {
        return Some(v.assume_utc());
    }
    if let Ok(v) = PrimitiveDateTime::parse(
        value,
        macros::format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Some(v.assume_utc());
    }
    Date::parse(value, macros::format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|v| v.midnight().assume_utc())
}

/// Argument handed to a built-in validator.
#[derive(Debug, Clone)]
pub enum ValidatorArg {
    Value(Value),
    /// The record being validated, passed to `isImmutable`.
    Record(Arc<Record>),
}

impl ValidatorArg {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Record(..) => None,
        }
    }
}

impl PartialEq for ValidatorArg {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(l), Self::Value(r)) => l == r,
            (Self::Record(l), Self::Record(r)) => Arc::ptr_eq(l, r),
            _ => false,
        }
    }
}

/// Completion handle given to callback style validators.
///
/// Dropping it without calling any method fails the validator.
pub struct ValidatorCallback {
    sender: oneshot::Sender<Result<()>>,
}

impl ValidatorCallback {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<Result<()>>) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender }, receiver)
    }
    pub fn call(self, result: Result<()>) {
        // The receiver is gone only when the pass itself was dropped.
        let _ = self.sender.send(result);
    }
    pub fn ok(self) {
        self.call(Ok(()));
    }
    pub fn fail(self, message: impl Display) {
        self.call(Err(Error::msg(message.to_string())));
    }
}

pub type SyncValidator = dyn Fn(&Record, &Value) -> Result<()> + Send + Sync;
pub type CallbackValidator = dyn Fn(&Record, &Value, ValidatorCallback) + Send + Sync;
pub type FutureValidator =
    dyn Fn(Arc<Record>, Value) -> BoxFuture<'static, Result<()>> + Send + Sync;

/// User supplied validation function. Model level validators receive `Value::Null`.
#[derive(Clone)]
pub enum ValidatorFn {
    Sync(Arc<SyncValidator>),
    Callback(Arc<CallbackValidator>),
    Future(Arc<FutureValidator>),
}

impl ValidatorFn {
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&Record, &Value) -> Result<()> + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(f))
    }
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&Record, &Value, ValidatorCallback) + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(f))
    }
    pub fn future<F, Fut>(f: F) -> Self
    where
        F: Fn(Arc<Record>, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self::Future(Arc::new(move |record, value| f(record, value).boxed()))
    }
}

impl Debug for ValidatorFn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sync(..) => "ValidatorFn::Sync",
            Self::Callback(..) => "ValidatorFn::Callback",
            Self::Future(..) => "ValidatorFn::Future",
        })
    }
}

#[derive(Debug, Clone)]
pub enum ValidatorRule {
    Builtin(BuiltinValidator),
    Custom(ValidatorFn),
}

impl From<BuiltinValidator> for ValidatorRule {
    fn from(value: BuiltinValidator) -> Self {
        Self::Builtin(value)
    }
}

impl From<ValidatorFn> for ValidatorRule {
    fn from(value: ValidatorFn) -> Self {
        Self::Custom(value)
    }
}

#[derive(Debug, Clone)]
pub struct AttributeValidator {
    pub name: String,
    pub rule: ValidatorRule,
}

#[derive(Debug, Clone)]
pub struct AttributeDefinition {
    pub name: String,
    pub data_type: DataType,
    pub allow_null: bool,
    pub auto_increment: bool,
    pub auto_generated: bool,
    pub validators: Vec<AttributeValidator>,
}

impl AttributeDefinition {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            allow_null: true,
            auto_increment: false,
            auto_generated: false,
            validators: Vec::new(),
        }
    }
    pub fn not_null(mut self) -> Self {
        self.allow_null = false;
        self
    }
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
    pub fn auto_generated(mut self) -> Self {
        self.auto_generated = true;
        self
    }
    /// Adds a built-in validator by its camelCase name, failing on unknown names.
    pub fn builtin(self, name: &str, args: impl Into<Value>) -> Result<Self> {
        Ok(self.with_builtin(BuiltinValidator::new(name, args)?))
    }
    pub fn with_builtin(mut self, validator: BuiltinValidator) -> Self {
        self.validators.push(AttributeValidator {
            name: validator.kind.name().to_string(),
            rule: validator.into(),
        });
        self
    }
    pub fn with_custom(mut self, name: impl Into<String>, validator: ValidatorFn) -> Self {
        self.validators.push(AttributeValidator {
            name: name.into(),
            rule: validator.into(),
        });
        self
    }
    pub fn validator(&self, name: &str) -> Option<&AttributeValidator> {
        self.validators.iter().find(|v| v.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Association {
    BelongsTo {
        foreign_key: String,
        accessor: String,
    },
}

/// Validation side description of a model.
#[derive(Clone, Default)]
pub struct ModelDefinition {
    pub name: String,
    pub attributes: Vec<AttributeDefinition>,
    /// Model level validators, keyed by name.
    pub validators: Vec<(String, ValidatorFn)>,
    pub associations: Vec<Association>,
    pub hooks: Option<Arc<dyn ValidationHooks>>,
}

impl ModelDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
    pub fn attribute(mut self, attribute: AttributeDefinition) -> Self {
        self.attributes.push(attribute);
        self
    }
    pub fn validator(mut self, name: impl Into<String>, validator: ValidatorFn) -> Self {
        self.validators.push((name.into(), validator));
        self
    }
    pub fn belongs_to(mut self, foreign_key: impl Into<String>, accessor: impl Into<String>) -> Self {
        self.associations.push(Association::BelongsTo {
            foreign_key: foreign_key.into(),
            accessor: accessor.into(),
        });
        self
    }
    pub fn hooks(mut self, hooks: Arc<dyn ValidationHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }
    pub fn get_attribute(&self, name: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|v| v.name == name)
    }
}

impl Debug for ModelDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelDefinition")
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .field("validators", &self.validators)
            .field("associations", &self.associations)
            .field("hooks", &self.hooks.is_some())
            .finish()
    }
}

static NULL: Value = Value::Null;

/// Instance under validation.
#[derive(Debug, Clone)]
pub struct Record {
    pub model: Arc<ModelDefinition>,
    pub values: Row,
    /// Values as last loaded from the database.
    pub previous: Row,
    /// Accessors of the associated instances currently set.
    pub associated: Vec<String>,
    pub is_new_record: bool,
}

impl Record {
    pub fn new(model: Arc<ModelDefinition>, values: Row) -> Self {
        Self {
            model,
            values,
            previous: Row::new(),
            associated: Vec::new(),
            is_new_record: true,
        }
    }
    /// Record loaded from the database, `previous` starts equal to `values`.
    pub fn persisted(model: Arc<ModelDefinition>, values: Row) -> Self {
        Self {
            previous: values.clone(),
            is_new_record: false,
            ..Self::new(model, values)
        }
    }
    pub fn associate(mut self, accessor: impl Into<String>) -> Self {
        self.associated.push(accessor.into());
        self
    }
    /// Current value of `attribute`, missing attributes read as null.
    pub fn get(&self, attribute: &str) -> &Value {
        self.values.get(attribute).unwrap_or(&NULL)
    }
    pub fn is_associated(&self, accessor: &str) -> bool {
        self.associated.iter().any(|v| v == accessor)
    }
    pub async fn validate(self: &Arc<Self>, options: ValidateOptions) -> Result<Arc<Record>> {
        InstanceValidator::new(self.clone(), options).validate().await
    }
}
