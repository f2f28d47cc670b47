use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Supported bucketing granularities for history requests.
///
/// The names mirror what the provider accepts, so `as_str` doubles as the
/// wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "5d")]
    FiveDay,
    #[serde(rename = "1wk")]
    Weekly,
    #[serde(rename = "1mo")]
    Monthly,
    #[serde(rename = "3mo")]
    Quarterly,
}

impl Interval {
    pub const ALL: [Self; 5] = [
        Self::Daily,
        Self::FiveDay,
        Self::Weekly,
        Self::Monthly,
        Self::Quarterly,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::FiveDay => "5d",
            Self::Weekly => "1wk",
            Self::Monthly => "1mo",
            Self::Quarterly => "3mo",
        }
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1d" => Ok(Self::Daily),
            "5d" => Ok(Self::FiveDay),
            "1wk" => Ok(Self::Weekly),
            "1mo" => Ok(Self::Monthly),
            "3mo" => Ok(Self::Quarterly),
            other => Err(ValidationError::InvalidInterval {
                value: other.to_owned(),
            }),
        }
    }
}
