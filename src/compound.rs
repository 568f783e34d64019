use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SoilMapError;

/// A measured soil property that can be requested for a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compound {
    #[serde(rename = "soc")]
    SocStock,
    Sand,
    Clay,
}

impl Compound {
    pub const ALL: [Compound; 3] = [Compound::SocStock, Compound::Sand, Compound::Clay];

    /// Display name used on buttons and in the legend
    pub fn name(&self) -> &'static str {
        match self {
            Compound::SocStock => "SOC stock",
            Compound::Sand => "Sand",
            Compound::Clay => "Clay",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Compound::SocStock => "t/ha",
            Compound::Sand | Compound::Clay => "mass %",
        }
    }

    /// Path segment used in `/api/compound/:compound` and on the backend
    pub fn slug(&self) -> &'static str {
        match self {
            Compound::SocStock => "soc",
            Compound::Sand => "sand",
            Compound::Clay => "clay",
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Compound {
    type Err = SoilMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "soc" | "soc-stock" | "soc_stock" => Ok(Compound::SocStock),
            "sand" => Ok(Compound::Sand),
            "clay" => Ok(Compound::Clay),
            other => Err(SoilMapError::UnknownCompound(other.to_string())),
        }
    }
}
