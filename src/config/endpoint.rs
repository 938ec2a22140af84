use std::fmt;

use super::env::EnvSource;

/// The three storage roles. Each one resolves to its own [`EndpointConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Source,
    Target,
    Listing,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Source, Role::Target, Role::Listing];

    /// Prefix of the environment variables for this role, e.g. `SRC`.
    #[must_use]
    pub fn env_prefix(self) -> &'static str {
        match self {
            Role::Source => "SRC",
            Role::Target => "TAR",
            Role::Listing => "LST",
        }
    }

    /// Short lower-case name, used for flag names and in messages.
    #[must_use]
    pub fn short_name(self) -> &'static str {
        match self {
            Role::Source => "src",
            Role::Target => "tar",
            Role::Listing => "lst",
        }
    }

    #[must_use]
    pub fn env_var(self, field: Field) -> String {
        format!("{}_{}", self.env_prefix(), field.env_suffix())
    }

    #[must_use]
    pub fn flag_name(self, field: Field) -> String {
        format!("{}{}", self.short_name(), field.flag_suffix())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// One configurable field of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Endpoint,
    Region,
    Bucket,
    AccessKey,
    SecretKey,
    SessionToken,
    Prefix,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Endpoint,
        Field::Region,
        Field::Bucket,
        Field::AccessKey,
        Field::SecretKey,
        Field::SessionToken,
        Field::Prefix,
    ];

    #[must_use]
    pub fn env_suffix(self) -> &'static str {
        match self {
            Field::Endpoint => "ENDPOINT",
            Field::Region => "REGION",
            Field::Bucket => "BUCKET",
            Field::AccessKey => "ACCESS_KEY",
            Field::SecretKey => "SECRET_KEY",
            Field::SessionToken => "SESSION_TOKEN",
            Field::Prefix => "PREFIX",
        }
    }

    #[must_use]
    pub fn flag_suffix(self) -> &'static str {
        match self {
            Field::Endpoint => "endpoint",
            Field::Region => "region",
            Field::Bucket => "bucket",
            Field::AccessKey => "accesskey",
            Field::SecretKey => "secretkey",
            Field::SessionToken => "sessiontoken",
            Field::Prefix => "prefix",
        }
    }

    /// Human-readable name, as shown in `--help`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Field::Endpoint => "endpoint",
            Field::Region => "region",
            Field::Bucket => "bucket",
            Field::AccessKey => "access key",
            Field::SecretKey => "secret key",
            Field::SessionToken => "session token",
            Field::Prefix => "prefix",
        }
    }

    /// Credential fields, whose values are never echoed.
    #[must_use]
    pub fn is_secret(self) -> bool {
        matches!(self, Field::AccessKey | Field::SecretKey | Field::SessionToken)
    }
}

/// How to reach one object-storage role.
///
/// Every field is a plain string where empty means "not set": an empty
/// endpoint or region falls back to the provider default, and an empty
/// credential triple falls back to the ambient credential chain.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EndpointConfig {
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub session_token: String,
    pub prefix: String,
}

impl EndpointConfig {
    /// Read every field of `role` from the environment. Missing variables stay empty.
    pub fn from_env<E: EnvSource + ?Sized>(role: Role, env: &E) -> Self {
        let mut config = Self::default();
        for field in Field::ALL {
            if let Some(value) = env.var(&role.env_var(field)) {
                config.set(field, value);
            }
        }
        config
    }

    #[must_use]
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Endpoint => &self.endpoint,
            Field::Region => &self.region,
            Field::Bucket => &self.bucket,
            Field::AccessKey => &self.access_key,
            Field::SecretKey => &self.secret_key,
            Field::SessionToken => &self.session_token,
            Field::Prefix => &self.prefix,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        *self.field_mut(field) = value;
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Endpoint => &mut self.endpoint,
            Field::Region => &mut self.region,
            Field::Bucket => &mut self.bucket,
            Field::AccessKey => &mut self.access_key,
            Field::SecretKey => &mut self.secret_key,
            Field::SessionToken => &mut self.session_token,
            Field::Prefix => &mut self.prefix,
        }
    }

    /// Replace each field with the one from `layer` when the latter is non-empty.
    pub fn overlay(&mut self, layer: &EndpointConfig) {
        for field in Field::ALL {
            let value = layer.field(field);
            if !value.is_empty() {
                *self.field_mut(field) = value.to_string();
            }
        }
    }

    /// True when no field at all has been set.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        Field::ALL.iter().all(|f| self.field(*f).is_empty())
    }

    /// True when any of the three credential fields is set.
    #[must_use]
    pub fn has_static_credentials(&self) -> bool {
        !self.access_key.is_empty() || !self.secret_key.is_empty() || !self.session_token.is_empty()
    }
}

fn mask(value: &str, visible: usize) -> String {
    if value.is_empty() {
        String::new()
    } else {
        let shown: String = value.chars().take(visible).collect();
        format!("{shown}****")
    }
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("access_key", &mask(&self.access_key, 4))
            .field("secret_key", &mask(&self.secret_key, 0))
            .field("session_token", &mask(&self.session_token, 0))
            .field("prefix", &self.prefix)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn env_and_flag_names_follow_role_and_field() {
        assert_eq!(Role::Source.env_var(Field::SessionToken), "SRC_SESSION_TOKEN");
        assert_eq!(Role::Listing.env_var(Field::Prefix), "LST_PREFIX");
        assert_eq!(Role::Target.flag_name(Field::AccessKey), "taraccesskey");
        assert_eq!(Role::Listing.flag_name(Field::Bucket), "lstbucket");
    }

    #[test]
    fn from_env_reads_only_its_own_role() {
        let env: HashMap<String, String> = [
            ("TAR_BUCKET", "tar-bucket"),
            ("TAR_REGION", "eu-west-1"),
            ("SRC_BUCKET", "src-bucket"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let tar = EndpointConfig::from_env(Role::Target, &env);
        assert_eq!(tar.bucket, "tar-bucket");
        assert_eq!(tar.region, "eu-west-1");
        assert!(tar.endpoint.is_empty());

        let lst = EndpointConfig::from_env(Role::Listing, &env);
        assert!(lst.is_unset());
    }

    #[test]
    fn overlay_skips_empty_values() {
        let mut base = EndpointConfig {
            bucket: "env-bucket".into(),
            region: "us-east-1".into(),
            ..Default::default()
        };
        let layer = EndpointConfig {
            bucket: "flag-bucket".into(),
            ..Default::default()
        };
        base.overlay(&layer);
        assert_eq!(base.bucket, "flag-bucket");
        assert_eq!(base.region, "us-east-1");
    }

    #[test]
    fn prefix_alone_makes_config_set() {
        let config = EndpointConfig {
            prefix: "listings/".into(),
            ..Default::default()
        };
        assert!(!config.is_unset());
        assert!(!config.has_static_credentials());
    }

    #[test]
    fn debug_output_masks_secrets() {
        let config = EndpointConfig {
            bucket: "b".into(),
            access_key: "AKIAEXAMPLE".into(),
            secret_key: "very-secret".into(),
            session_token: "token".into(),
            ..Default::default()
        };
        let rendered = format!("{config:?}");
        assert!(rendered.contains("AKIA****"));
        assert!(!rendered.contains("very-secret"));
        assert!(!rendered.contains("\"token\""));
    }
}
