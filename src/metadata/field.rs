//! Field descriptors.
//!
//! A field is declared once per configuration type with typed accessors; the
//! descriptor erases them so that properties can be read and written through
//! `&dyn Any` views of an instance.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::{ConfigRef, PropertyValue};
use crate::errors::{AccessError, ConversionError};

pub(crate) type Getter = Arc<dyn Fn(&dyn Any) -> Result<PropertyValue, AccessError> + Send + Sync>;
pub(crate) type Setter =
    Arc<dyn Fn(&mut dyn Any, PropertyValue) -> Result<(), AccessError> + Send + Sync>;
pub(crate) type Decoder =
    Arc<dyn Fn(&toml::Value) -> Result<PropertyValue, ConversionError> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldModifier {
    Instance,
    /// Type-level field. Never a property.
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Plain,
    /// Holds the inner object a decorating configuration wraps.
    Delegate,
}

/// What a field stores, as far as the analyzer cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Plain,
    Config,
}

/// Marks a field as injectable from an external configuration source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectMarker {
    /// Property name to use instead of the field name.
    pub alias: Option<String>,
    pub optional: bool,
}

#[derive(Clone)]
pub(crate) struct FieldAccess {
    pub(crate) getter: Getter,
    pub(crate) setter: Option<Setter>,
    pub(crate) decoder: Option<Decoder>,
}

/// One declared field of a configuration type.
#[derive(Clone)]
pub struct FieldDescriptor {
    name: String,
    value_type: &'static str,
    value_type_id: TypeId,
    kind: ValueKind,
    modifier: FieldModifier,
    role: FieldRole,
    inject: Option<InjectMarker>,
    access: Option<FieldAccess>,
}

fn downcast<C: Any>(target: &dyn Any) -> Result<&C, AccessError> {
    target
        .downcast_ref::<C>()
        .ok_or_else(|| AccessError::TypeMismatch {
            expected: type_name::<C>().to_string(),
            found: format!("{:?}", target.type_id()),
        })
}

fn downcast_mut<C: Any>(target: &mut dyn Any) -> Result<&mut C, AccessError> {
    let found = format!("{:?}", (*target).type_id());
    target
        .downcast_mut::<C>()
        .ok_or_else(|| AccessError::TypeMismatch {
            expected: type_name::<C>().to_string(),
            found,
        })
}

impl FieldDescriptor {
    fn instance(
        name: &str,
        value_type: &'static str,
        value_type_id: TypeId,
        kind: ValueKind,
        access: FieldAccess,
    ) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            value_type_id,
            kind,
            modifier: FieldModifier::Instance,
            role: FieldRole::Plain,
            inject: None,
            access: Some(access),
        }
    }

    /// A plain instance field with a getter and a setter.
    pub fn value<C, T, G, S>(name: &str, get: G, set: S) -> Self
    where
        C: Any,
        T: Clone + DeserializeOwned + Send + Sync + 'static,
        G: Fn(&C) -> T + Send + Sync + 'static,
        S: Fn(&mut C, T) + Send + Sync + 'static,
    {
        let mut field = Self::read_only::<C, T, G>(name, get);
        let setter: Setter = Arc::new(move |target: &mut dyn Any, value: PropertyValue| {
            let typed = value
                .downcast_ref::<T>()
                .cloned()
                .ok_or_else(|| AccessError::ValueType {
                    expected: type_name::<T>().to_string(),
                    found: value.describe(),
                })?;
            set(downcast_mut::<C>(target)?, typed);
            Ok(())
        });
        if let Some(access) = field.access.as_mut() {
            access.setter = Some(setter);
        }
        field
    }

    /// A plain instance field that can only be read.
    pub fn read_only<C, T, G>(name: &str, get: G) -> Self
    where
        C: Any,
        T: Clone + DeserializeOwned + Send + Sync + 'static,
        G: Fn(&C) -> T + Send + Sync + 'static,
    {
        let getter: Getter = Arc::new(move |target: &dyn Any| {
            Ok(PropertyValue::of(get(downcast::<C>(target)?)))
        });
        let decoder: Decoder = Arc::new(|raw: &toml::Value| {
            let typed: T = raw.clone().try_into()?;
            Ok(PropertyValue::of(typed))
        });
        Self::instance(
            name,
            type_name::<T>(),
            TypeId::of::<T>(),
            ValueKind::Plain,
            FieldAccess {
                getter,
                setter: None,
                decoder: Some(decoder),
            },
        )
    }

    /// An instance field holding a nested configuration object.
    pub fn config<C, G, S>(name: &str, get: G, set: S) -> Self
    where
        C: Any,
        G: Fn(&C) -> ConfigRef + Send + Sync + 'static,
        S: Fn(&mut C, ConfigRef) + Send + Sync + 'static,
    {
        let getter: Getter = Arc::new(move |target: &dyn Any| {
            Ok(PropertyValue::Config(get(downcast::<C>(target)?)))
        });
        let setter: Setter = Arc::new(move |target: &mut dyn Any, value: PropertyValue| {
            let found = value.describe();
            let config = value.into_config().ok_or(AccessError::ValueType {
                expected: "configuration object".to_string(),
                found,
            })?;
            set(downcast_mut::<C>(target)?, config);
            Ok(())
        });
        Self::instance(
            name,
            type_name::<ConfigRef>(),
            TypeId::of::<ConfigRef>(),
            ValueKind::Config,
            FieldAccess {
                getter,
                setter: Some(setter),
                decoder: None,
            },
        )
    }

    /// The injectable field a decorating configuration wraps its inner object in.
    pub fn delegate<C, G, S>(name: &str, get: G, set: S) -> Self
    where
        C: Any,
        G: Fn(&C) -> ConfigRef + Send + Sync + 'static,
        S: Fn(&mut C, ConfigRef) + Send + Sync + 'static,
    {
        Self::config::<C, G, S>(name, get, set)
            .role(FieldRole::Delegate)
            .inject()
    }

    /// A type-level field of value type `T`.
    pub fn static_field<T: 'static>(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value_type: type_name::<T>(),
            value_type_id: TypeId::of::<T>(),
            kind: ValueKind::Plain,
            modifier: FieldModifier::Static,
            role: FieldRole::Plain,
            inject: None,
            access: None,
        }
    }

    pub fn inject(mut self) -> Self {
        self.inject.get_or_insert_with(InjectMarker::default);
        self
    }

    /// Inject under a property name different from the field name.
    pub fn inject_as(mut self, alias: &str) -> Self {
        self.inject.get_or_insert_with(InjectMarker::default).alias = Some(alias.to_string());
        self
    }

    pub fn optional(mut self) -> Self {
        self.inject.get_or_insert_with(InjectMarker::default).optional = true;
        self
    }

    /// Drop the inject marker, e.g. from a field built with [`FieldDescriptor::delegate`].
    pub fn not_injected(mut self) -> Self {
        self.inject = None;
        self
    }

    pub fn role(mut self, role: FieldRole) -> Self {
        self.role = role;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &'static str {
        self.value_type
    }

    pub fn value_type_id(&self) -> TypeId {
        self.value_type_id
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn modifier(&self) -> FieldModifier {
        self.modifier
    }

    pub fn is_static(&self) -> bool {
        self.modifier == FieldModifier::Static
    }

    pub fn field_role(&self) -> FieldRole {
        self.role
    }

    pub fn inject_marker(&self) -> Option<&InjectMarker> {
        self.inject.as_ref()
    }

    pub(crate) fn access(&self) -> Option<&FieldAccess> {
        self.access.as_ref()
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("modifier", &self.modifier)
            .field("role", &self.role)
            .field("inject", &self.inject)
            .finish()
    }
}
