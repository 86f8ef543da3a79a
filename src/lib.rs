//! Metadata analysis for configuration types of a config-binding / DI host.
//!
//! Given the [`TypeDescriptor`] of a configuration type, the crate derives
//! the ordered list of its injectable properties, locates its lifecycle
//! hooks, and unwraps decorating configuration objects.

pub mod config;
pub mod errors;
pub mod introspect;
pub mod lifecycle;
pub mod metadata;
pub mod property;
pub mod strip;

// Re-export commonly used items for convenience
pub use config::AnalyzerConfig;
pub use errors::{IntrospectError, Result};
pub use introspect::{PropertyIndex, TypeIntrospector, index_by_name, index_type};
pub use lifecycle::{LifecycleMarker, LifecyclePolicy, find_method_with_marker};
pub use metadata::{
    ConfigObject, ConfigRef, FieldDescriptor, MethodDescriptor, MethodHandle, PropertyValue,
    TypeDescriptor,
};
pub use property::{InjectableProperty, PropertyFactory, PropertyValueConverter};
pub use strip::{strip_deep, strip_deep_with_config, strip_deep_with_limit, strip_shallow};
