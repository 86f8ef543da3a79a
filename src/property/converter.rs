use std::any::TypeId;

use crate::errors::ConversionError;
use crate::metadata::{PropertyValue, ValueKind};

/// Describes the property a raw value is being converted for.
#[derive(Debug, Clone, Copy)]
pub struct TargetType<'a> {
    pub property: &'a str,
    pub type_name: &'static str,
    pub type_id: TypeId,
    pub kind: ValueKind,
}

impl TargetType<'_> {
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

/// Converts raw configuration values into typed property values.
///
/// Returning `Ok(None)` leaves the value to the field's own serde-based decoding.
pub trait PropertyValueConverter: Send + Sync {
    fn convert(
        &self,
        raw: &toml::Value,
        target: &TargetType<'_>,
    ) -> Result<Option<PropertyValue>, ConversionError>;
}

impl<F> PropertyValueConverter for F
where
    F: Fn(&toml::Value, &TargetType<'_>) -> Result<Option<PropertyValue>, ConversionError>
        + Send
        + Sync,
{
    fn convert(
        &self,
        raw: &toml::Value,
        target: &TargetType<'_>,
    ) -> Result<Option<PropertyValue>, ConversionError> {
        self(raw, target)
    }
}
