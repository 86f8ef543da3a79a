//! Explicit metadata describing configuration types.
//!
//! Each configuration type publishes a [`TypeDescriptor`] listing its own
//! fields and methods in declaration order and the type it extends. The
//! analyzer works exclusively from these tables.

mod descriptor;
mod field;
mod method;
mod object;

pub use descriptor::{TypeDescriptor, TypeDescriptorBuilder};
pub use field::{FieldDescriptor, FieldModifier, FieldRole, InjectMarker, ValueKind};
pub use method::{HookError, MethodDescriptor, MethodHandle, Visibility};
pub use object::{ConfigObject, ConfigRef, PropertyValue, same_object};
