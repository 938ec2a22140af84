use clap::{Arg, ArgMatches, Command, FromArgMatches, Parser};

use crate::config::resolver::TAR_FORMAT_ENV;
use crate::config::{EnvSource, Field, Overrides, ProcessEnv, Role, TarFormat};

const TAR_FORMAT_FLAG: &str = "tarformat";

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(flatten)]
    pub endpoints: EndpointFlags,

    /// Print extra stuff (use -v -v or --verbose --verbose for even more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Abort listing and fetching after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

impl Args {
    /// The override layer for configuration resolution.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        self.endpoints.overrides.clone()
    }
}

/// One `--<role><field>` flag per environment variable (e.g. `--srcbucket`
/// for `SRC_BUCKET`) plus `--tarformat`.
///
/// Each flag defaults to what the environment currently holds, so `--help`
/// shows the effective value; credential defaults are not echoed. A flag
/// given with an empty value leaves the environment value in place.
#[derive(Debug, Clone, Default)]
pub struct EndpointFlags {
    pub overrides: Overrides,
}

impl EndpointFlags {
    /// Add every role flag and `--tarformat` to `cmd`, with defaults read from `env`.
    pub fn augment_with_env<E: EnvSource + ?Sized>(mut cmd: Command, env: &E) -> Command {
        for role in Role::ALL {
            for field in Field::ALL {
                let name = role.flag_name(field);
                let mut arg = Arg::new(name.clone())
                    .long(name)
                    .help(format!("{role} {}", field.label()));
                if let Some(value) = env.var(&role.env_var(field)).filter(|v| !v.is_empty()) {
                    arg = arg
                        .default_value(value)
                        .hide_default_value(field.is_secret());
                }
                cmd = cmd.arg(arg);
            }
        }

        let format = env
            .var(TAR_FORMAT_ENV)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| TarFormat::default().to_string());
        cmd.arg(
            Arg::new(TAR_FORMAT_FLAG)
                .long(TAR_FORMAT_FLAG)
                .value_name("FORMAT")
                .help("tar format (USTAR|PAX|GNU)")
                .default_value(format),
        )
    }
}

impl clap::Args for EndpointFlags {
    fn augment_args(cmd: Command) -> Command {
        Self::augment_with_env(cmd, &ProcessEnv)
    }

    fn augment_args_for_update(cmd: Command) -> Command {
        Self::augment_args(cmd)
    }
}

impl FromArgMatches for EndpointFlags {
    fn from_arg_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let mut flags = Self::default();
        flags.update_from_arg_matches(matches)?;
        Ok(flags)
    }

    fn update_from_arg_matches(&mut self, matches: &ArgMatches) -> Result<(), clap::Error> {
        for role in Role::ALL {
            for field in Field::ALL {
                if let Some(value) = matches.get_one::<String>(&role.flag_name(field)) {
                    self.overrides.for_role_mut(role).set(field, value.clone());
                }
            }
        }
        if let Some(value) = matches.get_one::<String>(TAR_FORMAT_FLAG) {
            self.overrides.tar_format = value.clone();
        }
        Ok(())
    }
}
