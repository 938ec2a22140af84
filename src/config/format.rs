use std::fmt;
use std::str::FromStr;

/// Archive flavour written to the target store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TarFormat {
    Ustar,
    #[default]
    Pax,
    Gnu,
}

impl TarFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TarFormat::Ustar => "USTAR",
            TarFormat::Pax => "PAX",
            TarFormat::Gnu => "GNU",
        }
    }
}

impl FromStr for TarFormat {
    type Err = String;

    // Exact, case-sensitive match only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USTAR" => Ok(TarFormat::Ustar),
            "PAX" => Ok(TarFormat::Pax),
            "GNU" => Ok(TarFormat::Gnu),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for TarFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
