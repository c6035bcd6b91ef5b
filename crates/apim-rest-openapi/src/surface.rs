//! The two management API surfaces that carry definition documents.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A management REST API whose definition drives request authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApiSurface {
    /// Developer-portal API (applications, subscriptions, keys).
    Store,
    /// Publisher API (API lifecycle, documents, tiers).
    Publisher,
}

impl ApiSurface {
    /// Every surface, in slot order.
    pub const ALL: [Self; 2] = [Self::Store, Self::Publisher];

    /// Lowercase name, as used in config keys and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Publisher => "publisher",
        }
    }

    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::Store => 0,
            Self::Publisher => 1,
        }
    }
}

impl fmt::Display for ApiSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiSurface {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "store" => Ok(Self::Store),
            "publisher" => Ok(Self::Publisher),
            _ => Err(Error::UnknownSurface {
                name: s.to_string(),
            }),
        }
    }
}
