//! LifeCycle - Deployment environment

use serde::{Deserialize, Serialize};

/// Application life cycle. Development relaxes configuration requirements.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifeCycle {
    #[default]
    Dev,
    PreProd,
    Prod,
}

impl LifeCycle {
    pub fn is_dev(&self) -> bool {
        matches!(self, LifeCycle::Dev)
    }
}

impl std::fmt::Display for LifeCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifeCycle::Dev => write!(f, "DEV"),
            LifeCycle::PreProd => write!(f, "PRE_PROD"),
            LifeCycle::Prod => write!(f, "PROD"),
        }
    }
}

impl std::str::FromStr for LifeCycle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEV" => Ok(LifeCycle::Dev),
            "PRE_PROD" => Ok(LifeCycle::PreProd),
            "PROD" => Ok(LifeCycle::Prod),
            _ => Err(format!("Unknown life cycle: {}", s)),
        }
    }
}
