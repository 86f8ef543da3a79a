use thiserror::Error;

use crate::lifecycle::LifecycleMarker;

/// Errors raised while analysing configuration types or instances.
#[derive(Debug, Error)]
pub enum IntrospectError {
    #[error("Field '{field}' of '{type_name}' is malformed: {reason}")]
    MalformedField {
        type_name: String,
        field: String,
        reason: String,
    },
    #[error("Duplicate property name '{name}' (declared by '{first}' and '{second}')")]
    DuplicateProperty {
        name: String,
        first: String,
        second: String,
    },
    #[error("Type '{type_name}' has more than one {marker} method: {}", methods.join(", "))]
    AmbiguousLifecycleMarker {
        marker: LifecycleMarker,
        type_name: String,
        methods: Vec<String>,
    },
    #[error("Cannot access property '{property}' on '{type_name}': {source}")]
    PropertyAccess {
        property: String,
        type_name: String,
        #[source]
        source: AccessError,
    },
    #[error("Cannot convert value for property '{property}': {source}")]
    Conversion {
        property: String,
        #[source]
        source: ConversionError,
    },
    #[error("Failed to strip decoration from '{type_name}': {source}")]
    StripFailed {
        type_name: String,
        #[source]
        source: Box<IntrospectError>,
    },
    #[error(
        "Decoration cycle suspected: '{type_name}' is still decorated after {max_depth} layers"
    )]
    DecorationCycleSuspected { type_name: String, max_depth: usize },
}

/// Low-level failures of the type-erased field accessors.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("expected an instance of '{expected}', found '{found}'")]
    TypeMismatch { expected: String, found: String },
    #[error("'{runtime}' does not extend '{declaring}'")]
    NotInHierarchy { declaring: String, runtime: String },
    #[error("property is read-only")]
    ReadOnly,
    #[error("static fields carry no instance value")]
    StaticField,
    #[error("expected a value of type '{expected}', found {found}")]
    ValueType { expected: String, found: String },
}

/// Failures of converting a raw configuration value into a typed field value.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("no conversion available for type '{0}'")]
    Unsupported(String),
    #[error("failed to decode value: {0}")]
    Decode(#[from] toml::de::Error),
    #[error("{0}")]
    Custom(String),
}

/// Errors raised while loading analyzer settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to parse TOML from '{0}': {1}")]
    TomlParse(String, #[source] toml::de::Error),
    #[error("Invalid value '{value}' for environment variable {key}")]
    InvalidEnv { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, IntrospectError>;
