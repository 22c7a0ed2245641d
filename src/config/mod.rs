//! Configuration module
//!
//! Loading and validation of the device/project configuration file.

pub mod codes;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod value;

pub use codes::{ErrorCode, error_codes};
pub use loader::{ConfigFormat, ConfigLoader, LoadResult, LoadWarning, LoaderOptions};
pub use schema::DeviceEntry;
pub use validation::{ValidationIssue, ValidationResult, Validator, validate};
pub use value::{ConfigValue, Mapping};
