use mockall::automock;
use std::collections::HashMap;
use std::ffi::OsString;

/// Where environment-sourced configuration values come from.
#[automock]
pub trait EnvSource {
    /// Value of `name`, or `None` when it is not set.
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
///
/// A value that is not valid UTF-8 is converted lossily, with a warning on
/// stderr, rather than being treated as unset.
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|value| env_value_to_string(name, value))
    }
}

fn env_value_to_string(name: &str, value: OsString) -> String {
    value.into_string().unwrap_or_else(|raw| {
        let lossy = raw.to_string_lossy().into_owned();
        eprintln!("warn: {name} is not valid UTF-8, using {lossy:?}");
        lossy
    })
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}
