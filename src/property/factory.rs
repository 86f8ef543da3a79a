use std::sync::Arc;

use super::converter::PropertyValueConverter;
use super::injectable::InjectableProperty;
use crate::errors::{IntrospectError, Result};
use crate::metadata::{FieldDescriptor, FieldRole, TypeDescriptor, ValueKind};

/// Decides whether a field becomes an [`InjectableProperty`] and builds it.
pub trait PropertyFactory: Send + Sync {
    /// `Ok(None)` for ineligible fields. Errors are reserved for malformed
    /// field declarations and abort the whole discovery.
    fn try_create(
        &self,
        owner: &TypeDescriptor,
        field: &Arc<FieldDescriptor>,
        converter: Option<&Arc<dyn PropertyValueConverter>>,
    ) -> Result<Option<InjectableProperty>>;
}

/// Default factory: a field is a property when it carries an inject marker.
#[derive(Debug, Default, Clone, Copy)]
pub struct InjectablePropertyFactory;

impl InjectablePropertyFactory {
    fn malformed(owner: &TypeDescriptor, field: &FieldDescriptor, reason: &str) -> IntrospectError {
        IntrospectError::MalformedField {
            type_name: owner.name().to_string(),
            field: field.name().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl PropertyFactory for InjectablePropertyFactory {
    fn try_create(
        &self,
        owner: &TypeDescriptor,
        field: &Arc<FieldDescriptor>,
        converter: Option<&Arc<dyn PropertyValueConverter>>,
    ) -> Result<Option<InjectableProperty>> {
        let is_delegate = field.field_role() == FieldRole::Delegate;
        let Some(marker) = field.inject_marker() else {
            if is_delegate {
                return Err(Self::malformed(owner, field, "delegate field is not injectable"));
            }
            return Ok(None);
        };

        if is_delegate && field.kind() != ValueKind::Config {
            return Err(Self::malformed(
                owner,
                field,
                "delegate field must hold a configuration object",
            ));
        }
        if field.access().is_none() {
            return Err(Self::malformed(owner, field, "field has no accessors"));
        }

        let name = match &marker.alias {
            Some(alias) if alias.trim().is_empty() => {
                return Err(Self::malformed(owner, field, "inject alias is empty"));
            }
            Some(alias) => alias.clone(),
            None => field.name().to_string(),
        };

        Ok(Some(InjectableProperty::new(
            name,
            owner,
            field.clone(),
            converter.cloned(),
        )))
    }
}
