//! Runtime side of the metadata model: live configuration objects and the
//! values read off them.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::TypeDescriptor;

/// A live configuration object that can describe its own type.
///
/// Implement it with [`config_object!`](crate::config_object) rather than by hand.
pub trait ConfigObject: Any + Send + Sync {
    /// Descriptor of the runtime (most specific) type of this object.
    fn type_descriptor(&self) -> Arc<TypeDescriptor>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl fmt::Debug for dyn ConfigObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConfigObject({})", self.type_descriptor().name())
    }
}

/// Shared handle to a configuration object. Identity is the pointer.
pub type ConfigRef = Arc<dyn ConfigObject>;

/// Implements [`ConfigObject`] for a type given the function returning its descriptor.
#[macro_export]
macro_rules! config_object {
    ($ty:ty, $descriptor:path) => {
        impl $crate::metadata::ConfigObject for $ty {
            fn type_descriptor(&self) -> ::std::sync::Arc<$crate::metadata::TypeDescriptor> {
                $descriptor()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
}

/// Whether two handles point at the same object.
pub fn same_object(a: &ConfigRef, b: &ConfigRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Value of a property as read from (or written to) an instance.
#[derive(Clone)]
pub enum PropertyValue {
    /// A nested configuration object.
    Config(ConfigRef),
    /// Any other typed value.
    Value(Arc<dyn Any + Send + Sync>),
}

impl PropertyValue {
    pub fn of<T: Any + Send + Sync>(value: T) -> Self {
        PropertyValue::Value(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            PropertyValue::Value(value) => value.downcast_ref::<T>(),
            PropertyValue::Config(config) => config.as_any().downcast_ref::<T>(),
        }
    }

    pub fn as_config(&self) -> Option<&ConfigRef> {
        match self {
            PropertyValue::Config(config) => Some(config),
            PropertyValue::Value(_) => None,
        }
    }

    pub fn into_config(self) -> Option<ConfigRef> {
        match self {
            PropertyValue::Config(config) => Some(config),
            PropertyValue::Value(_) => None,
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            PropertyValue::Config(config) => {
                format!("configuration object '{}'", config.type_descriptor().name())
            }
            PropertyValue::Value(_) => "a plain value".to_string(),
        }
    }
}

impl fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Config(config) => f.debug_tuple("Config").field(config).finish(),
            PropertyValue::Value(_) => f.write_str("Value(..)"),
        }
    }
}
