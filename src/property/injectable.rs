use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use log::trace;

use super::converter::{PropertyValueConverter, TargetType};
use crate::errors::{AccessError, ConversionError, IntrospectError, Result};
use crate::metadata::{ConfigObject, FieldDescriptor, FieldRole, PropertyValue, TypeDescriptor};

/// A field of a configuration type that can receive a value from an external
/// configuration source.
#[derive(Clone)]
pub struct InjectableProperty {
    name: String,
    declaring_type: String,
    declaring_type_id: TypeId,
    field: Arc<FieldDescriptor>,
    converter: Option<Arc<dyn PropertyValueConverter>>,
}

impl InjectableProperty {
    pub(crate) fn new(
        name: String,
        owner: &TypeDescriptor,
        field: Arc<FieldDescriptor>,
        converter: Option<Arc<dyn PropertyValueConverter>>,
    ) -> Self {
        Self {
            name,
            declaring_type: owner.name().to_string(),
            declaring_type_id: owner.id(),
            field,
            converter,
        }
    }

    /// Property name: the inject alias if one is set, the field name otherwise.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_name(&self) -> &str {
        self.field.name()
    }

    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    pub fn value_type(&self) -> &'static str {
        self.field.value_type()
    }

    pub fn is_delegate(&self) -> bool {
        self.field.field_role() == FieldRole::Delegate
    }

    pub fn is_optional(&self) -> bool {
        self.field.inject_marker().is_some_and(|m| m.optional)
    }

    pub fn is_writable(&self) -> bool {
        self.field
            .access()
            .is_some_and(|access| access.setter.is_some())
    }

    fn access_error(&self, instance: &dyn ConfigObject, source: AccessError) -> IntrospectError {
        IntrospectError::PropertyAccess {
            property: self.name.clone(),
            type_name: instance.type_descriptor().name().to_string(),
            source,
        }
    }

    fn not_in_hierarchy(&self, runtime: &TypeDescriptor) -> AccessError {
        AccessError::NotInHierarchy {
            declaring: self.declaring_type.clone(),
            runtime: runtime.name().to_string(),
        }
    }

    /// Reads the property off `instance`, an instance of the declaring type or
    /// of any of its subtypes.
    pub fn get_value(&self, instance: &dyn ConfigObject) -> Result<PropertyValue> {
        let access = self
            .field
            .access()
            .ok_or_else(|| self.access_error(instance, AccessError::StaticField))?;
        let descriptor = instance.type_descriptor();
        let target = descriptor
            .view(instance.as_any(), self.declaring_type_id)
            .ok_or_else(|| self.access_error(instance, self.not_in_hierarchy(&descriptor)))?;
        (access.getter)(target).map_err(|source| self.access_error(instance, source))
    }

    /// Writes an already typed value into the property of `instance`.
    pub fn set_value(&self, instance: &mut dyn ConfigObject, value: PropertyValue) -> Result<()> {
        let access = self
            .field
            .access()
            .ok_or_else(|| self.access_error(instance, AccessError::StaticField))?;
        let setter = access
            .setter
            .as_ref()
            .ok_or_else(|| self.access_error(instance, AccessError::ReadOnly))?;
        let descriptor = instance.type_descriptor();
        let runtime = descriptor.name().to_string();
        let outcome = match descriptor.view_mut(instance.as_any_mut(), self.declaring_type_id) {
            Some(target) => setter(target, value),
            None => Err(self.not_in_hierarchy(&descriptor)),
        };
        outcome.map_err(|source| IntrospectError::PropertyAccess {
            property: self.name.clone(),
            type_name: runtime,
            source,
        })
    }

    /// Converts a raw configuration value into this property's type.
    ///
    /// The converter, when present, is asked first; the field's own decoding
    /// applies when it declines.
    pub fn convert(&self, raw: &toml::Value) -> Result<PropertyValue> {
        let target = TargetType {
            property: &self.name,
            type_name: self.field.value_type(),
            type_id: self.field.value_type_id(),
            kind: self.field.kind(),
        };
        let conversion_error = |source: ConversionError| IntrospectError::Conversion {
            property: self.name.clone(),
            source,
        };

        if let Some(converter) = &self.converter {
            if let Some(value) = converter.convert(raw, &target).map_err(conversion_error)? {
                trace!("converter handled property '{}'", self.name);
                return Ok(value);
            }
        }

        let decoder = self
            .field
            .access()
            .and_then(|access| access.decoder.as_ref())
            .ok_or_else(|| {
                conversion_error(ConversionError::Unsupported(
                    self.field.value_type().to_string(),
                ))
            })?;
        decoder(raw).map_err(conversion_error)
    }

    /// Converts `raw` and writes the result into `instance`.
    pub fn inject_raw(&self, instance: &mut dyn ConfigObject, raw: &toml::Value) -> Result<()> {
        let value = self.convert(raw)?;
        self.set_value(instance, value)
    }
}

impl fmt::Debug for InjectableProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectableProperty")
            .field("name", &self.name)
            .field("declaring_type", &self.declaring_type)
            .field("value_type", &self.field.value_type())
            .field("delegate", &self.is_delegate())
            .finish()
    }
}
