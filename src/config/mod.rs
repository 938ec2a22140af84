pub mod endpoint;
pub mod env;
pub mod format;
pub mod resolver;

pub use endpoint::{EndpointConfig, Field, Role};
pub use env::{EnvSource, ProcessEnv};
pub use format::TarFormat;
pub use resolver::{ConfigOptions, ConfigResolver, Overrides, ResolvedConfig};
