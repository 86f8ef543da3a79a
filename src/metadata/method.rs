use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use super::ConfigObject;
use crate::errors::AccessError;
use crate::lifecycle::LifecycleMarker;

/// Error type returned by lifecycle hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

type Hook = Arc<dyn Fn(&dyn Any) -> Result<(), HookError> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// A method declared by a configuration type.
#[derive(Clone)]
pub struct MethodDescriptor {
    name: String,
    visibility: Visibility,
    markers: Vec<LifecycleMarker>,
    hook: Hook,
}

impl MethodDescriptor {
    pub fn new<C, F>(name: &str, body: F) -> Self
    where
        C: Any,
        F: Fn(&C) -> Result<(), HookError> + Send + Sync + 'static,
    {
        let hook: Hook = Arc::new(move |target: &dyn Any| {
            let this = target
                .downcast_ref::<C>()
                .ok_or_else(|| AccessError::TypeMismatch {
                    expected: type_name::<C>().to_string(),
                    found: format!("{:?}", target.type_id()),
                })?;
            body(this)
        });
        Self {
            name: name.to_string(),
            visibility: Visibility::Public,
            markers: Vec::new(),
            hook,
        }
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn marked(mut self, marker: LifecycleMarker) -> Self {
        if !self.markers.contains(&marker) {
            self.markers.push(marker);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn has_marker(&self, marker: LifecycleMarker) -> bool {
        self.markers.contains(&marker)
    }

    pub(crate) fn handle(&self, declaring_type: &str, declaring_type_id: TypeId) -> MethodHandle {
        MethodHandle {
            name: self.name.clone(),
            declaring_type: declaring_type.to_string(),
            declaring_type_id,
            hook: self.hook.clone(),
        }
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("markers", &self.markers)
            .finish()
    }
}

/// Reference to a lifecycle method found on a type. Invoking it is up to the caller.
#[derive(Clone)]
pub struct MethodHandle {
    name: String,
    declaring_type: String,
    declaring_type_id: TypeId,
    hook: Hook,
}

impl MethodHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    /// Runs the method on `instance`, which may be of any subtype of the declaring type.
    pub fn invoke(&self, instance: &dyn ConfigObject) -> Result<(), HookError> {
        let descriptor = instance.type_descriptor();
        let target = descriptor
            .view(instance.as_any(), self.declaring_type_id)
            .ok_or_else(|| AccessError::NotInHierarchy {
                declaring: self.declaring_type.clone(),
                runtime: descriptor.name().to_string(),
            })?;
        (self.hook)(target)
    }
}

impl fmt::Debug for MethodHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodHandle({}::{})", self.declaring_type, self.name)
    }
}

impl PartialEq for MethodHandle {
    fn eq(&self, other: &Self) -> bool {
        self.declaring_type_id == other.declaring_type_id && self.name == other.name
    }
}
