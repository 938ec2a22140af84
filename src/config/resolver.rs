use super::endpoint::{EndpointConfig, Role};
use super::env::EnvSource;
use super::format::TarFormat;
use crate::errors::ConfigError;

/// Environment variable carrying the tar format tag.
pub const TAR_FORMAT_ENV: &str = "TAR_FORMAT";

/// Explicitly supplied values (usually from the command line).
///
/// Empty strings mean "not supplied" and never replace an environment value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub source: EndpointConfig,
    pub target: EndpointConfig,
    pub listing: EndpointConfig,
    pub tar_format: String,
}

impl Overrides {
    #[must_use]
    pub fn for_role(&self, role: Role) -> &EndpointConfig {
        match role {
            Role::Source => &self.source,
            Role::Target => &self.target,
            Role::Listing => &self.listing,
        }
    }

    pub fn for_role_mut(&mut self, role: Role) -> &mut EndpointConfig {
        match role {
            Role::Source => &mut self.source,
            Role::Target => &mut self.target,
            Role::Listing => &mut self.listing,
        }
    }
}

/// Layered but not yet validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOptions {
    pub source: EndpointConfig,
    pub target: EndpointConfig,
    pub listing: EndpointConfig,
    pub tar_format: String,
}

/// Validated configuration for all three roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub source: EndpointConfig,
    pub target: EndpointConfig,
    pub listing: EndpointConfig,
    pub tar_format: TarFormat,
}

impl ConfigOptions {
    #[must_use]
    pub fn endpoint(&self, role: Role) -> &EndpointConfig {
        match role {
            Role::Source => &self.source,
            Role::Target => &self.target,
            Role::Listing => &self.listing,
        }
    }

    /// Check every role and the format tag, collecting all violations.
    ///
    /// # Errors
    ///
    /// Returns every violation found; the list is never empty on `Err`.
    pub fn validate(self) -> Result<ResolvedConfig, Vec<ConfigError>> {
        let mut errors: Vec<ConfigError> = Role::ALL
            .into_iter()
            .filter(|role| self.endpoint(*role).bucket.is_empty())
            .map(|role| ConfigError::BucketNotSet { role })
            .collect();

        let tar_format = match self.tar_format.parse::<TarFormat>() {
            Ok(format) => Some(format),
            Err(raw) => {
                errors.push(ConfigError::InvalidTarFormat(raw));
                None
            }
        };

        match tar_format {
            Some(tar_format) if errors.is_empty() => Ok(ResolvedConfig {
                source: self.source,
                target: self.target,
                listing: self.listing,
                tar_format,
            }),
            _ => Err(errors),
        }
    }
}

/// Builds the per-role configuration from defaults, environment and overrides.
pub struct ConfigResolver<'a, E: EnvSource + ?Sized> {
    env: &'a E,
    overrides: &'a Overrides,
}

impl<'a, E: EnvSource + ?Sized> ConfigResolver<'a, E> {
    pub fn new(env: &'a E, overrides: &'a Overrides) -> Self {
        Self { env, overrides }
    }

    fn layer_role(&self, role: Role) -> EndpointConfig {
        let mut config = EndpointConfig::from_env(role, self.env);
        config.overlay(self.overrides.for_role(role));
        config
    }

    /// Apply default -> environment -> override layering and the listing fallback.
    #[must_use]
    pub fn layer(&self) -> ConfigOptions {
        let mut tar_format = TarFormat::default().as_str().to_string();
        if let Some(value) = self.env.var(TAR_FORMAT_ENV).filter(|v| !v.is_empty()) {
            tar_format = value;
        }
        if !self.overrides.tar_format.is_empty() {
            tar_format = self.overrides.tar_format.clone();
        }

        let source = self.layer_role(Role::Source);
        let target = self.layer_role(Role::Target);
        let mut listing = self.layer_role(Role::Listing);

        // Whole-record fallback only: a partially set listing config is kept as is.
        if listing.is_unset() {
            listing = target.clone();
        }

        ConfigOptions {
            source,
            target,
            listing,
            tar_format,
        }
    }

    /// Layer and validate in one step.
    ///
    /// # Errors
    ///
    /// Returns every [`ConfigError`] found by [`ConfigOptions::validate`].
    pub fn resolve(&self) -> Result<ResolvedConfig, Vec<ConfigError>> {
        self.layer().validate()
    }
}
