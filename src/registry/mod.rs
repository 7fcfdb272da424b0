// ABOUTME: Environment registry module built from a delimited value grid
// ABOUTME: Exports the registry, its loader, environments and integrity checks

pub mod environment;
pub mod error;
#[allow(clippy::module_inception)]
pub mod registry;
pub mod validation;

pub use environment::Environment;
pub use error::{RegistryError, Result};
pub use registry::{EnvironmentRegistry, RegistryLoader};
pub use validation::{verify_environments, verify_keys};
