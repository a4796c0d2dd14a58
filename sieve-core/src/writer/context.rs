use crate::{BindParameters, BindStyle};

#[derive(Default, Debug, Clone, PartialEq)]
pub struct WriteContext {
    /// Table or alias columns are prefixed with.
    pub qualifier: Option<String>,
    /// Collected values, literals are inlined when missing.
    pub bind: Option<BindParameters>,
}

impl WriteContext {
    pub fn new() -> Self {
        Default::default()
    }
    /// Context collecting bind parameters, inline style collects nothing.
    pub fn binding(style: BindStyle) -> Self {
        Self {
            qualifier: None,
            bind: (style != BindStyle::Inline).then(|| BindParameters::new(style)),
        }
    }
    pub fn into_bind(self, style: BindStyle) -> BindParameters {
        self.bind.unwrap_or_else(|| BindParameters::new(style))
    }
}
