//! Property discovery over a configuration type hierarchy.

use std::collections::VecDeque;
use std::sync::Arc;

use indexmap::IndexMap;
use indexmap::map::Entry;
use log::debug;

use crate::config::AnalyzerConfig;
use crate::errors::{IntrospectError, Result};
use crate::lifecycle::{LifecycleMarker, find_method_with_marker};
use crate::metadata::{ConfigRef, MethodHandle, TypeDescriptor};
use crate::property::{
    InjectableProperty, InjectablePropertyFactory, PropertyFactory, PropertyValueConverter,
};
use crate::strip::strip_deep_with_config;

/// Analyzes one configuration type. Nothing is cached: every call works from
/// the descriptor again.
#[derive(Clone)]
pub struct TypeIntrospector {
    target: Arc<TypeDescriptor>,
    converter: Option<Arc<dyn PropertyValueConverter>>,
    factory: Arc<dyn PropertyFactory>,
    config: AnalyzerConfig,
}

impl TypeIntrospector {
    pub fn new(target: Arc<TypeDescriptor>) -> Self {
        Self {
            target,
            converter: None,
            factory: Arc::new(InjectablePropertyFactory),
            config: AnalyzerConfig::default(),
        }
    }

    /// Properties discovered by this introspector carry `converter`.
    pub fn with_converter(
        target: Arc<TypeDescriptor>,
        converter: Arc<dyn PropertyValueConverter>,
    ) -> Self {
        Self {
            converter: Some(converter),
            ..Self::new(target)
        }
    }

    pub fn with_factory(mut self, factory: Arc<dyn PropertyFactory>) -> Self {
        self.factory = factory;
        self
    }

    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn target(&self) -> &Arc<TypeDescriptor> {
        &self.target
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// The target type and all its ancestors, root first.
    fn hierarchy(&self) -> VecDeque<&TypeDescriptor> {
        let mut chain = VecDeque::new();
        let mut each = Some(self.target.as_ref());
        while let Some(ty) = each {
            chain.push_front(ty);
            each = ty.parent().map(|p| p.as_ref());
        }
        chain
    }

    /// Injectable properties of the target type: ancestors' first, then in
    /// declaration order within each type. Static fields are never considered.
    pub fn discover_properties(&self) -> Result<Vec<InjectableProperty>> {
        let mut properties = Vec::new();
        for ty in self.hierarchy() {
            for field in ty.declared_fields() {
                if field.is_static() {
                    continue;
                }
                if let Some(property) =
                    self.factory
                        .try_create(ty, field, self.converter.as_ref())?
                {
                    properties.push(property);
                }
            }
        }
        debug!(
            "discovered {} injectable properties on '{}'",
            properties.len(),
            self.target.name()
        );
        Ok(properties)
    }

    /// The first property marked as delegate, if any.
    pub fn delegate_property(&self) -> Result<Option<InjectableProperty>> {
        Ok(self
            .discover_properties()?
            .into_iter()
            .find(InjectableProperty::is_delegate))
    }

    pub fn post_construct_method(&self) -> Result<Option<MethodHandle>> {
        find_method_with_marker(
            LifecycleMarker::PostConstruct,
            &self.target,
            self.config.lifecycle_policy,
        )
    }

    pub fn pre_destroy_method(&self) -> Result<Option<MethodHandle>> {
        find_method_with_marker(
            LifecycleMarker::PreDestroy,
            &self.target,
            self.config.lifecycle_policy,
        )
    }

    /// Removes all layers of decoration from `decorated` under this
    /// introspector's depth limit.
    pub fn strip_deep(&self, decorated: &ConfigRef) -> Result<ConfigRef> {
        strip_deep_with_config(decorated, &self.config)
    }

    /// Discovered properties indexed by name, in discovery order.
    pub fn to_map(&self) -> Result<PropertyIndex> {
        index_by_name(&self.discover_properties()?)
    }
}

/// Properties keyed by name. Iteration follows discovery order.
pub type PropertyIndex = IndexMap<String, InjectableProperty>;

/// Indexes `properties` by name, keeping their order. Two properties with the
/// same name are an error.
pub fn index_by_name(properties: &[InjectableProperty]) -> Result<PropertyIndex> {
    let mut index = PropertyIndex::with_capacity(properties.len());
    for property in properties {
        match index.entry(property.name().to_string()) {
            Entry::Occupied(existing) => {
                return Err(IntrospectError::DuplicateProperty {
                    name: property.name().to_string(),
                    first: existing.get().declaring_type().to_string(),
                    second: property.declaring_type().to_string(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(property.clone());
            }
        }
    }
    Ok(index)
}

/// Discovers the properties of `descriptor` and indexes them by name.
pub fn index_type(descriptor: Arc<TypeDescriptor>) -> Result<PropertyIndex> {
    TypeIntrospector::new(descriptor).to_map()
}
