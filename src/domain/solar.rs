use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Roof orientation, with the derate applied to annual production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    South,
    SouthEastWest,
    EastWest,
    North,
}

impl Orientation {
    /// Production multiplier relative to an ideal south-facing roof.
    pub fn derate(self) -> f64 {
        match self {
            Orientation::South => 1.0,
            Orientation::SouthEastWest => 0.92,
            Orientation::EastWest => 0.80,
            Orientation::North => 0.60,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Orientation::South => "Sud",
            Orientation::SouthEastWest => "Sud-Est / Sud-Oest",
            Orientation::EastWest => "Est / Oest",
            Orientation::North => "Nord",
        }
    }

    /// Parses the user-facing labels; unrecognised input is treated as
    /// south-facing, the most common residential case.
    pub fn from_name(name: &str) -> Orientation {
        match name.trim().to_lowercase().as_str() {
            "sud" | "sur" | "south" | "s" => Orientation::South,
            "sud-est / sud-oest" | "sud-est" | "sud-oest" | "se" | "so" | "sw" => {
                Orientation::SouthEastWest
            }
            "est / oest" | "est" | "oest" | "e" | "o" | "w" => Orientation::EastWest,
            "nord" | "norte" | "north" | "n" => Orientation::North,
            _ => Orientation::South,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Orientation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Orientation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Orientation::from_name(&name))
    }
}

/// Result of a rooftop photovoltaic simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarEstimate {
    /// Peak capacity the roof can hold, kWp.
    pub installable_kw: f64,
    /// Production after orientation and system-loss derates, kWh/year.
    pub annual_production_kwh: f64,
    /// Modelled fraction of production consumed on-site, within [0.3, 0.8].
    pub self_consumption_ratio: f64,
    pub self_consumed_kwh: f64,
    pub surplus_kwh: f64,
    pub annual_savings_eur: f64,
    pub installation_cost_eur: f64,
    /// Years until cumulative savings cover the installation;
    /// 0 signals "no payback under current assumptions".
    pub payback_years: f64,
    pub co2_avoided_kg: f64,
}
