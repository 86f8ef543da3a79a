//! Unwrapping of decorating configuration objects.
//!
//! A decorating configuration wraps an inner configuration object in its
//! delegate property. Stripping replaces an object by that inner object.

use log::trace;

use crate::config::AnalyzerConfig;
use crate::errors::{IntrospectError, Result};
use crate::introspect::TypeIntrospector;
use crate::metadata::{ConfigRef, same_object};

fn strip_failed(decorated: &ConfigRef, source: IntrospectError) -> IntrospectError {
    IntrospectError::StripFailed {
        type_name: decorated.type_descriptor().name().to_string(),
        source: Box::new(source),
    }
}

/// Removes one layer of decoration. An undecorated object is returned as is.
pub fn strip_shallow(decorated: &ConfigRef) -> Result<ConfigRef> {
    let introspector = TypeIntrospector::new(decorated.type_descriptor());
    let delegate = introspector
        .delegate_property()
        .map_err(|e| strip_failed(decorated, e))?;

    let Some(delegate) = delegate else {
        return Ok(decorated.clone());
    };

    let value = delegate
        .get_value(decorated.as_ref())
        .map_err(|e| strip_failed(decorated, e))?;
    let found = value.describe();
    value.into_config().ok_or_else(|| {
        strip_failed(
            decorated,
            IntrospectError::MalformedField {
                type_name: delegate.declaring_type().to_string(),
                field: delegate.field_name().to_string(),
                reason: format!("delegate holds {} instead of a configuration object", found),
            },
        )
    })
}

/// Removes all layers of decoration, guarded by the default maximum depth.
pub fn strip_deep(decorated: &ConfigRef) -> Result<ConfigRef> {
    strip_deep_with_config(decorated, &AnalyzerConfig::default())
}

/// Removes all layers of decoration, guarded by `config.max_decoration_depth`.
pub fn strip_deep_with_config(decorated: &ConfigRef, config: &AnalyzerConfig) -> Result<ConfigRef> {
    strip_deep_with_limit(decorated, config.max_decoration_depth)
}

/// Removes all layers of decoration until an object strips to itself.
///
/// Fails with [`IntrospectError::DecorationCycleSuspected`] once more than
/// `max_depth` layers would be removed. `None` means no limit, in which case a
/// cyclic decoration chain never terminates.
pub fn strip_deep_with_limit(decorated: &ConfigRef, max_depth: Option<usize>) -> Result<ConfigRef> {
    let mut current = decorated.clone();
    let mut removed = 0usize;
    loop {
        let stripped = strip_shallow(&current)?;
        if same_object(&stripped, &current) {
            trace!("stripped {} decoration layer(s)", removed);
            return Ok(current);
        }

        removed += 1;
        if let Some(limit) = max_depth {
            if removed > limit {
                return Err(IntrospectError::DecorationCycleSuspected {
                    type_name: decorated.type_descriptor().name().to_string(),
                    max_depth: limit,
                });
            }
        }
        current = stripped;
    }
}
