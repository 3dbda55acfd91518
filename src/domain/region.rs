//! Static reference tables for the 17 Spanish autonomous communities.
//!
//! Every region maps to one of three geographic price zones for the live
//! market feed, and independently to its own row in the fallback-price,
//! solar-yield and average-consumption tables. Unknown region names fall
//! into [`Region::Altres`], which carries the national defaults.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use strum::EnumIter;

/// Geographic price zone used by the ESIOS market feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceZone {
    Peninsula,
    Balears,
    Canaries,
}

impl PriceZone {
    /// ESIOS geo_id for PVPC indicator records in this zone.
    pub fn geo_id(self) -> u32 {
        match self {
            PriceZone::Peninsula => 8741,
            PriceZone::Canaries => 8742,
            PriceZone::Balears => 8743,
        }
    }

    /// All-in residential €/kWh used when the live feed is unavailable
    /// (2024-2025 averages, taxes included).
    pub fn fallback_price_eur_kwh(self) -> f64 {
        match self {
            PriceZone::Peninsula => 0.21,
            PriceZone::Canaries => 0.18,
            PriceZone::Balears => 0.24,
        }
    }
}

/// Spanish autonomous community, Catalan spelling as shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Region {
    Catalunya,
    Madrid,
    Andalusia,
    ComunitatValenciana,
    PaisBasc,
    Galicia,
    Arago,
    CastellaILleo,
    CastellaLaManxa,
    Murcia,
    Extremadura,
    Asturies,
    Cantabria,
    Navarra,
    LaRioja,
    Balears,
    Canaries,
    /// Catch-all for region names outside the known set; lookups on it
    /// yield the national defaults and peninsula pricing.
    Altres,
}

impl Region {
    pub fn name(self) -> &'static str {
        match self {
            Region::Catalunya => "Catalunya",
            Region::Madrid => "Madrid",
            Region::Andalusia => "Andalusia",
            Region::ComunitatValenciana => "Comunitat Valenciana",
            Region::PaisBasc => "País Basc",
            Region::Galicia => "Galícia",
            Region::Arago => "Aragó",
            Region::CastellaILleo => "Castella i Lleó",
            Region::CastellaLaManxa => "Castella-La Manxa",
            Region::Murcia => "Murcia",
            Region::Extremadura => "Extremadura",
            Region::Asturies => "Astúries",
            Region::Cantabria => "Cantàbria",
            Region::Navarra => "Navarra",
            Region::LaRioja => "La Rioja",
            Region::Balears => "Balears",
            Region::Canaries => "Canàries",
            Region::Altres => "Altres",
        }
    }

    /// Total parse: unknown names resolve to [`Region::Altres`] so that
    /// every caller gets a usable catalog row.
    pub fn from_name(name: &str) -> Region {
        match name.trim().to_lowercase().as_str() {
            "catalunya" | "cataluña" => Region::Catalunya,
            "madrid" => Region::Madrid,
            "andalusia" | "andalucía" | "andalucia" => Region::Andalusia,
            "comunitat valenciana" | "comunidad valenciana" => Region::ComunitatValenciana,
            "país basc" | "pais basc" | "país vasco" | "euskadi" => Region::PaisBasc,
            "galícia" | "galicia" => Region::Galicia,
            "aragó" | "arago" | "aragón" | "aragon" => Region::Arago,
            "castella i lleó" | "castella i lleo" | "castilla y león" | "castilla y leon" => {
                Region::CastellaILleo
            }
            "castella-la manxa" | "castilla-la mancha" => Region::CastellaLaManxa,
            "murcia" | "múrcia" => Region::Murcia,
            "extremadura" => Region::Extremadura,
            "astúries" | "asturies" | "asturias" => Region::Asturies,
            "cantàbria" | "cantabria" => Region::Cantabria,
            "navarra" => Region::Navarra,
            "la rioja" => Region::LaRioja,
            "balears" | "illes balears" | "baleares" => Region::Balears,
            "canàries" | "canaries" | "canarias" => Region::Canaries,
            _ => Region::Altres,
        }
    }

    /// Geographic price zone for the live market feed.
    pub fn price_zone(self) -> PriceZone {
        match self {
            Region::Balears => PriceZone::Balears,
            Region::Canaries => PriceZone::Canaries,
            _ => PriceZone::Peninsula,
        }
    }

    /// Static reference retail price €/kWh, used when no live price is
    /// available.
    pub fn fallback_price_eur_kwh(self) -> f64 {
        match self {
            Region::Catalunya => 0.23,
            Region::Madrid => 0.21,
            Region::Andalusia => 0.22,
            Region::ComunitatValenciana => 0.22,
            Region::PaisBasc => 0.24,
            Region::Galicia => 0.21,
            Region::Arago => 0.22,
            Region::CastellaILleo => 0.21,
            Region::CastellaLaManxa => 0.21,
            Region::Murcia => 0.22,
            Region::Extremadura => 0.22,
            Region::Asturies => 0.23,
            Region::Cantabria => 0.23,
            Region::Navarra => 0.22,
            Region::LaRioja => 0.22,
            Region::Balears => 0.25,
            Region::Canaries => 0.19,
            Region::Altres => 0.22,
        }
    }

    /// Annual solar yield in kWh produced per installed kWp.
    /// Sources: PVGIS, IDAE irradiation averages for Spain.
    pub fn solar_yield_kwh_per_kwp(self) -> f64 {
        match self {
            Region::Catalunya => 1550.0,
            Region::Madrid => 1650.0,
            Region::Andalusia => 1750.0,
            Region::ComunitatValenciana => 1700.0,
            Region::PaisBasc => 1300.0,
            Region::Galicia => 1400.0,
            Region::Arago => 1650.0,
            Region::CastellaILleo => 1600.0,
            Region::CastellaLaManxa => 1700.0,
            Region::Murcia => 1750.0,
            Region::Extremadura => 1700.0,
            Region::Asturies => 1350.0,
            Region::Cantabria => 1350.0,
            Region::Navarra => 1550.0,
            Region::LaRioja => 1650.0,
            Region::Balears => 1650.0,
            Region::Canaries => 1850.0,
            Region::Altres => 1550.0,
        }
    }

    /// Average monthly household consumption in kWh (IDAE/CNMC 2023-2024).
    pub fn avg_monthly_consumption_kwh(self) -> f64 {
        match self {
            Region::Catalunya => 210.0,
            Region::Madrid => 195.0,
            Region::Andalusia => 220.0,
            Region::ComunitatValenciana => 205.0,
            Region::PaisBasc => 190.0,
            Region::Galicia => 185.0,
            Region::Arago => 200.0,
            Region::CastellaILleo => 195.0,
            Region::CastellaLaManxa => 210.0,
            Region::Murcia => 215.0,
            Region::Extremadura => 205.0,
            Region::Asturies => 195.0,
            Region::Cantabria => 190.0,
            Region::Navarra => 185.0,
            Region::LaRioja => 195.0,
            Region::Balears => 240.0,
            Region::Canaries => 195.0,
            Region::Altres => 205.0,
        }
    }

    /// Compare a monthly consumption against the regional average.
    pub fn compare_monthly_consumption(self, monthly_kwh: f64) -> ConsumptionReference {
        let reference = self.avg_monthly_consumption_kwh();
        let ratio = if reference > 0.0 {
            monthly_kwh / reference
        } else {
            1.0
        };
        ConsumptionReference {
            region: self,
            reference_monthly_kwh: reference,
            ratio,
        }
    }
}

/// Monthly consumption measured against the regional average;
/// `ratio` of 1.2 means 20% above it.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConsumptionReference {
    pub region: Region,
    pub reference_monthly_kwh: f64,
    pub ratio: f64,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Region::from_name(&name))
    }
}
