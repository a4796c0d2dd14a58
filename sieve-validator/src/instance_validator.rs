use crate::{
    Association, AttributeDefinition, BuiltinValidator, ErrorAggregate, Record, ValidationError,
    ValidationErrorItem, ValidationErrorKind, ValidationInProgress, ValidatorCallback,
    ValidatorFn, ValidatorRule,
};
use futures::future::{join, join_all};
use sieve_core::{Error, Result, Value};
use std::sync::{Arc, Mutex, PoisonError};

/// Lifecycle of the pass owned by an [`InstanceValidator`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ValidationState {
    #[default]
    Idle,
    InProgress,
    Resolved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Run the model hooks around the pass.
    pub hooks: bool,
    /// When set, attributes not listed are skipped.
    pub fields: Option<Vec<String>>,
    /// Attributes and model validators left out of the pass.
    pub skip: Vec<String>,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            hooks: true,
            fields: None,
            skip: Vec::new(),
        }
    }
}

/// Runs every validator of a record and collects the failures.
///
/// The schema checks, the attribute validators and the model validators run concurrently on
/// the caller's task. Every failure is collected, the first one does not cancel the others.
#[derive(Debug)]
pub struct InstanceValidator {
    record: Arc<Record>,
    options: ValidateOptions,
    state: Mutex<ValidationState>,
}

impl InstanceValidator {
    pub fn new(record: Arc<Record>, mut options: ValidateOptions) -> Self {
        if let Some(fields) = &options.fields {
            let skipped = record
                .model
                .attributes
                .iter()
                .map(|v| &v.name)
                .filter(|v| !fields.contains(*v) && !options.skip.contains(*v))
                .cloned()
                .collect::<Vec<_>>();
            options.skip.extend(skipped);
        }
        Self {
            record,
            options,
            state: Default::default(),
        }
    }

    pub fn record(&self) -> &Arc<Record> {
        &self.record
    }

    pub fn options(&self) -> &ValidateOptions {
        &self.options
    }

    pub fn state(&self) -> ValidationState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: ValidationState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    fn begin(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == ValidationState::InProgress {
            return Err(ValidationInProgress.into());
        }
        *state = ValidationState::InProgress;
        Ok(())
    }

    fn is_skipped(&self, name: &str) -> bool {
        self.options.skip.iter().any(|v| v == name)
    }

    /// Validates the record, resolving to it when every check passes.
    ///
    /// Fails with [`ValidationError`] when some check failed (or with whatever `validation_failed`
    /// substitutes), with [`ValidationInProgress`] when a pass is already running, or with the
    /// error of a hook.
    pub async fn validate(&self) -> Result<Arc<Record>> {
        self.begin()?;
        let result = self.run_with_hooks().await;
        self.set_state(if result.is_ok() {
            ValidationState::Resolved
        } else {
            ValidationState::Rejected
        });
        result
    }

    async fn run_with_hooks(&self) -> Result<Arc<Record>> {
        let hooks = if self.options.hooks {
            self.record.model.hooks.clone()
        } else {
            None
        };
        if let Some(hooks) = &hooks {
            hooks.before_validate(&self.record, &self.options).await?;
        }
        if let Err(error) = self.run().await {
            let Some(hooks) = &hooks else {
                return Err(error);
            };
            let substitute = hooks
                .validation_failed(&self.record, &self.options, &error)
                .await?;
            return Err(substitute.unwrap_or(error));
        }
        if let Some(hooks) = &hooks {
            hooks.after_validate(&self.record, &self.options).await?;
        }
        Ok(self.record.clone())
    }

    async fn run(&self) -> Result<()> {
        let errors = ErrorAggregate::default();
        join(
            self.attribute_validators(&errors),
            self.model_validators(&errors),
        )
        .await;
        let name = &self.record.model.name;
        if errors.is_empty() {
            log::debug!("Validation of `{name}` passed");
            return Ok(());
        }
        log::debug!(
            "Validation of `{name}` failed with {} error(s)",
            errors.len()
        );
        Err(ValidationError {
            errors: errors.into_inner(),
        }
        .into())
    }

    async fn attribute_validators(&self, errors: &ErrorAggregate) {
        let mut pending = Vec::new();
        for attribute in &self.record.model.attributes {
            if self.is_skipped(&attribute.name) {
                continue;
            }
            let value = self.record.get(&attribute.name);
            if !attribute.auto_generated && !attribute.auto_increment {
                self.check_schema(attribute, value, errors);
            }
            if !attribute.validators.is_empty() {
                pending.push(self.single_attribute(attribute, value, errors));
            }
        }
        join_all(pending).await;
    }

    async fn model_validators(&self, errors: &ErrorAggregate) {
        join_all(
            self.record
                .model
                .validators
                .iter()
                .filter(|(name, _)| !self.is_skipped(name))
                .map(|(name, validator)| self.invoke_custom(validator, name, name, None, errors)),
        )
        .await;
    }

    fn check_schema(&self, attribute: &AttributeDefinition, value: &Value, errors: &ErrorAggregate) {
        let model = &self.record.model;
        if value.is_null() {
            if attribute.allow_null {
                return;
            }
            let associated = model.associations.iter().any(|v| match v {
                Association::BelongsTo {
                    foreign_key,
                    accessor,
                } => *foreign_key == attribute.name && self.record.is_associated(accessor),
            });
            if associated {
                return;
            }
            let message = attribute
                .validator("notNull")
                .and_then(|v| match &v.rule {
                    ValidatorRule::Builtin(BuiltinValidator { msg, .. }) => msg.clone(),
                    ValidatorRule::Custom(..) => None,
                })
                .unwrap_or_else(|| format!("{}.{} cannot be null", model.name, attribute.name));
            errors.push(ValidationErrorItem::new(
                message,
                ValidationErrorKind::NotNullViolation,
                &attribute.name,
                Some(Value::Null),
                self.record.clone(),
                "is_null",
            ));
            return;
        }
        if let Err(error) = attribute.data_type.validate(value) {
            let item = if attribute.data_type.is_string() {
                ValidationErrorItem::new(
                    format!("{} {error}", attribute.name),
                    ValidationErrorKind::StringViolation,
                    &attribute.name,
                    Some(value.clone()),
                    self.record.clone(),
                    "not_a_string",
                )
            } else {
                ValidationErrorItem::new(
                    error.to_string(),
                    ValidationErrorKind::ValidationError,
                    &attribute.name,
                    Some(value.clone()),
                    self.record.clone(),
                    "datatype",
                )
            };
            errors.push(item);
        }
    }

    async fn single_attribute(
        &self,
        attribute: &AttributeDefinition,
        value: &Value,
        errors: &ErrorAggregate,
    ) {
        let field = attribute.name.as_str();
        let mut pending = Vec::new();
        for validator in &attribute.validators {
            match &validator.rule {
                ValidatorRule::Custom(custom) => {
                    pending.push(self.invoke_custom(
                        custom,
                        &validator.name,
                        field,
                        Some(value),
                        errors,
                    ));
                }
                // Built-ins never see null values
                ValidatorRule::Builtin(builtin) if !value.is_null() => {
                    self.invoke_builtin(builtin, field, value, errors)
                }
                ValidatorRule::Builtin(..) => {}
            }
        }
        join_all(pending).await;
    }

    fn invoke_builtin(
        &self,
        builtin: &BuiltinValidator,
        field: &str,
        value: &Value,
        errors: &ErrorAggregate,
    ) {
        let name = builtin.kind.name();
        let args = builtin.extract_args(field, &self.record);
        log::trace!(
            "Running validator `{name}` on `{}.{field}`",
            self.record.model.name
        );
        match builtin.kind.check(&value.to_string(), &args) {
            Ok(true) => {}
            Ok(false) => {
                let message = builtin
                    .msg
                    .clone()
                    .unwrap_or_else(|| format!("Validation {name} on {field} failed"));
                errors.push(
                    ValidationErrorItem::new(
                        message,
                        ValidationErrorKind::ValidationError,
                        field,
                        Some(value.clone()),
                        self.record.clone(),
                        name,
                    )
                    .with_validator(name, args),
                );
            }
            Err(error) => {
                errors.push(
                    ValidationErrorItem::new(
                        error.to_string(),
                        ValidationErrorKind::ValidationError,
                        field,
                        Some(value.clone()),
                        self.record.clone(),
                        name,
                    )
                    .with_original(error),
                );
            }
        }
    }

    /// Runs a user validator. `value` is `None` for model level validators, whose `path` is their name.
    async fn invoke_custom(
        &self,
        validator: &ValidatorFn,
        name: &str,
        path: &str,
        value: Option<&Value>,
        errors: &ErrorAggregate,
    ) {
        log::trace!(
            "Running validator `{name}` on `{}.{path}`",
            self.record.model.name
        );
        let input = value.cloned().unwrap_or_default();
        let result = match validator {
            ValidatorFn::Sync(f) => f(&self.record, &input),
            ValidatorFn::Callback(f) => {
                let (callback, receiver) = ValidatorCallback::channel();
                f(&self.record, &input, callback);
                receiver.await.unwrap_or_else(|_| {
                    Err(Error::msg(format!(
                        "Validator `{name}` dropped its callback without calling it"
                    )))
                })
            }
            ValidatorFn::Future(f) => f(self.record.clone(), input).await,
        };
        if let Err(error) = result {
            let message = match error.to_string() {
                v if v.is_empty() => "Validation error".to_string(),
                v => v,
            };
            errors.push(
                ValidationErrorItem::new(
                    message,
                    ValidationErrorKind::ValidationError,
                    path,
                    value.cloned(),
                    self.record.clone(),
                    name,
                )
                .with_original(error),
            );
        }
    }
}
