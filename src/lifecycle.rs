//! Lookup of lifecycle hooks (post-construct / pre-destroy) on configuration types.

use std::collections::HashSet;
use std::fmt;

use log::debug;
use serde::Deserialize;

use crate::errors::{IntrospectError, Result};
use crate::metadata::{MethodDescriptor, MethodHandle, TypeDescriptor, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleMarker {
    /// Run once the object has been constructed and its properties injected.
    PostConstruct,
    /// Run before the object is torn down.
    PreDestroy,
}

impl fmt::Display for LifecycleMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleMarker::PostConstruct => write!(f, "post-construct"),
            LifecycleMarker::PreDestroy => write!(f, "pre-destroy"),
        }
    }
}

/// How to treat a type exposing several methods with the same marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecyclePolicy {
    /// More than one marked method is a configuration error.
    #[default]
    Strict,
    /// The first marked method in scan order wins.
    FirstMatch,
}

impl std::str::FromStr for LifecyclePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(LifecyclePolicy::Strict),
            "first-match" | "first_match" => Ok(LifecyclePolicy::FirstMatch),
            other => Err(format!("unknown lifecycle policy '{}'", other)),
        }
    }
}

/// Public methods visible on `descriptor`, most specific type first and in
/// declaration order within a type, paired with their declaring type. A
/// method overridden by name in a subtype is only visible once.
fn visible_methods(descriptor: &TypeDescriptor) -> Vec<(&MethodDescriptor, &TypeDescriptor)> {
    let mut seen = HashSet::new();
    let mut visible = Vec::new();
    let mut current = Some(descriptor);
    while let Some(ty) = current {
        for method in ty.declared_methods() {
            if method.visibility() == Visibility::Public && seen.insert(method.name()) {
                visible.push((method.as_ref(), ty));
            }
        }
        current = ty.parent().map(|p| p.as_ref());
    }
    visible
}

/// Finds the method carrying `marker` on `descriptor` or its ancestors.
pub fn find_method_with_marker(
    marker: LifecycleMarker,
    descriptor: &TypeDescriptor,
    policy: LifecyclePolicy,
) -> Result<Option<MethodHandle>> {
    let matches: Vec<MethodHandle> = visible_methods(descriptor)
        .into_iter()
        .filter(|(method, _)| method.has_marker(marker))
        .map(|(method, ty)| method.handle(ty.name(), ty.id()))
        .collect();

    debug!(
        "{} {} method(s) found on '{}'",
        matches.len(),
        marker,
        descriptor.name()
    );

    match (policy, matches.len()) {
        (_, 0) => Ok(None),
        (LifecyclePolicy::FirstMatch, _) | (LifecyclePolicy::Strict, 1) => {
            Ok(matches.into_iter().next())
        }
        (LifecyclePolicy::Strict, _) => Err(IntrospectError::AmbiguousLifecycleMarker {
            marker,
            type_name: descriptor.name().to_string(),
            methods: matches
                .iter()
                .map(|m| format!("{}::{}", m.declaring_type(), m.name()))
                .collect(),
        }),
    }
}
