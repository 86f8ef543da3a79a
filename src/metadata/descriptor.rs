use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use super::{FieldDescriptor, MethodDescriptor};

type Project = Arc<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync>;
type ProjectMut = Arc<dyn for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any> + Send + Sync>;

fn project<F>(f: F) -> Project
where
    F: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn project_mut<F>(f: F) -> ProjectMut
where
    F: for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Link from a type to the ancestor it extends, with the projections that
/// reach the embedded ancestor value.
#[derive(Clone)]
struct ParentLink {
    descriptor: Arc<TypeDescriptor>,
    project: Project,
    project_mut: ProjectMut,
}

/// Metadata table of one configuration type: its own fields and methods, in
/// declaration order, plus the type it extends.
#[derive(Clone)]
pub struct TypeDescriptor {
    name: String,
    type_id: TypeId,
    parent: Option<ParentLink>,
    fields: Vec<Arc<FieldDescriptor>>,
    methods: Vec<Arc<MethodDescriptor>>,
}

impl TypeDescriptor {
    pub fn builder<C: Any>(name: &str) -> TypeDescriptorBuilder<C> {
        TypeDescriptorBuilder {
            descriptor: TypeDescriptor {
                name: name.to_string(),
                type_id: TypeId::of::<C>(),
                parent: None,
                fields: Vec::new(),
                methods: Vec::new(),
            },
            _marker: std::marker::PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `TypeId` of the described Rust type.
    pub fn id(&self) -> TypeId {
        self.type_id
    }

    pub fn parent(&self) -> Option<&Arc<TypeDescriptor>> {
        self.parent.as_ref().map(|link| &link.descriptor)
    }

    /// Fields declared on this type only, in declaration order.
    pub fn declared_fields(&self) -> &[Arc<FieldDescriptor>] {
        &self.fields
    }

    /// Methods declared on this type only, in declaration order.
    pub fn declared_methods(&self) -> &[Arc<MethodDescriptor>] {
        &self.methods
    }

    pub fn is_subtype_of(&self, ancestor: TypeId) -> bool {
        self.type_id == ancestor || self.parent().is_some_and(|p| p.is_subtype_of(ancestor))
    }

    /// Views `object`, an instance of this type, as the ancestor `target`.
    pub(crate) fn view<'a>(&self, object: &'a dyn Any, target: TypeId) -> Option<&'a dyn Any> {
        if self.type_id == target {
            return Some(object);
        }
        let link = self.parent.as_ref()?;
        link.descriptor.view((link.project)(object)?, target)
    }

    pub(crate) fn view_mut<'a>(
        &self,
        object: &'a mut dyn Any,
        target: TypeId,
    ) -> Option<&'a mut dyn Any> {
        if self.type_id == target {
            return Some(object);
        }
        let link = self.parent.as_ref()?;
        let parent = (link.project_mut)(object)?;
        link.descriptor.view_mut(parent, target)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("parent", &self.parent().map(|p| p.name()))
            .field("fields", &self.fields)
            .field("methods", &self.methods)
            .finish()
    }
}

/// Builds the descriptor of configuration type `C`.
pub struct TypeDescriptorBuilder<C> {
    descriptor: TypeDescriptor,
    _marker: std::marker::PhantomData<fn(C)>,
}

impl<C: Any> TypeDescriptorBuilder<C> {
    /// Declares that `C` extends the type described by `parent`, embedded in `C`
    /// and reachable through `up` / `up_mut`.
    pub fn extends<P: Any>(
        mut self,
        parent: Arc<TypeDescriptor>,
        up: fn(&C) -> &P,
        up_mut: fn(&mut C) -> &mut P,
    ) -> Self {
        debug_assert_eq!(parent.id(), TypeId::of::<P>());
        self.descriptor.parent = Some(ParentLink {
            descriptor: parent,
            project: project(move |object| object.downcast_ref::<C>().map(|c| up(c) as &dyn Any)),
            project_mut: project_mut(move |object| {
                object
                    .downcast_mut::<C>()
                    .map(|c| up_mut(c) as &mut dyn Any)
            }),
        });
        self
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.descriptor.fields.push(Arc::new(field));
        self
    }

    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.descriptor.methods.push(Arc::new(method));
        self
    }

    pub fn build(self) -> Arc<TypeDescriptor> {
        Arc::new(self.descriptor)
    }
}
