//! Deployment tiers and the tier resolver.
//!
//! A tier is the operational mode a request runs under. It changes what an
//! agent produces without changing the agent's interface. External input
//! (usually a request header) is normalised through [`Tier::resolve`], which
//! never fails: anything it does not recognise becomes [`Tier::DEFAULT`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment tier for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Individual use; privacy-first defaults.
    #[default]
    Personal,
    /// Organisational use; audit and integration concerns.
    Business,
    /// Public-sector use; governance and human oversight.
    Government,
}

impl Tier {
    /// Tier used for absent or unrecognised input.
    pub const DEFAULT: Tier = Tier::Personal;

    /// Every tier, in declaration order.
    pub const ALL: [Tier; 3] = [Tier::Personal, Tier::Business, Tier::Government];

    /// Normalise an arbitrary external value into a tier.
    ///
    /// The value is trimmed and compared case-insensitively. `None`, blank
    /// strings and unknown names all resolve to [`Tier::DEFAULT`].
    ///
    /// ```rust
    /// use strata_core::Tier;
    ///
    /// assert_eq!(Tier::resolve(Some(" Business ")), Tier::Business);
    /// assert_eq!(Tier::resolve(Some("alien")), Tier::Personal);
    /// assert_eq!(Tier::resolve(None), Tier::Personal);
    /// ```
    pub fn resolve(raw: Option<&str>) -> Self {
        raw.and_then(|value| Self::from_name(value.trim()))
            .unwrap_or(Self::DEFAULT)
    }

    /// Lowercase canonical name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Tier::Personal => "personal",
            Tier::Business => "business",
            Tier::Government => "government",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by the strict [`FromStr`] parse for names that are not a tier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tier '{value}' (expected personal, business or government)")]
pub struct TierParseError {
    pub value: String,
}

/// Strict parsing, for configuration and CLI input where a typo should be
/// reported rather than silently defaulted.
impl FromStr for Tier {
    type Err = TierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.trim()).ok_or_else(|| TierParseError {
            value: s.to_string(),
        })
    }
}
