//! Injectable properties and the factory deciding which fields become one.

mod converter;
mod factory;
mod injectable;

pub use converter::{PropertyValueConverter, TargetType};
pub use factory::{InjectablePropertyFactory, PropertyFactory};
pub use injectable::InjectableProperty;
