use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use strum::EnumIter;

/// Contract type, modelled after the CNMC tariff comparator categories.
///
/// Each kind carries a multiplicative factor over the regulated PVPC
/// reference price; PVPC itself is the baseline with factor 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum TariffKind {
    /// Regulated tariff, hourly market price passed through.
    Pvpc,
    /// Free-market contract indexed to the wholesale market.
    Indexed,
    /// Free-market fixed price, market average.
    Fixed,
    /// Free-market offers with high margins.
    Premium,
}

impl TariffKind {
    pub fn name(self) -> &'static str {
        match self {
            TariffKind::Pvpc => "PVPC (tarifa regulada)",
            TariffKind::Indexed => "Mercat lliure - Tarifa indexada",
            TariffKind::Fixed => "Mercat lliure - Tarifa fixa (mitjana)",
            TariffKind::Premium => "Mercat lliure - Tarifa cara",
        }
    }

    /// Multiplier over the PVPC reference price.
    pub fn factor(self) -> f64 {
        match self {
            TariffKind::Pvpc => 1.0,
            TariffKind::Indexed => 1.02,
            TariffKind::Fixed => 1.15,
            TariffKind::Premium => 1.35,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TariffKind::Pvpc => {
                "Preu hora a hora segons mercat. Sovint la més barata. Sense permanència."
            }
            TariffKind::Indexed => {
                "Preu variable segons OMIE. Similar al PVPC, pot tenir petits marges."
            }
            TariffKind::Fixed => "Preu fix. Previsibilitat, però sol ser més car que PVPC.",
            TariffKind::Premium => "Ofertes amb marges alts. Revisa la teva factura.",
        }
    }

    /// Total parse: unknown tariff names resolve to the regulated baseline.
    pub fn from_name(name: &str) -> TariffKind {
        match name.trim() {
            "PVPC (tarifa regulada)" => TariffKind::Pvpc,
            "Mercat lliure - Tarifa indexada" => TariffKind::Indexed,
            "Mercat lliure - Tarifa fixa (mitjana)" => TariffKind::Fixed,
            "Mercat lliure - Tarifa cara" => TariffKind::Premium,
            _ => TariffKind::Pvpc,
        }
    }

    /// Factor for a tariff selected by name; unknown names get the
    /// baseline factor 1.0.
    pub fn factor_for(name: &str) -> f64 {
        TariffKind::from_name(name).factor()
    }
}

impl fmt::Display for TariffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TariffKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for TariffKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(TariffKind::from_name(&name))
    }
}

/// Itemized simulation of a residential electricity bill.
///
/// Holds both the computed monetary terms and the inputs they were derived
/// from, so a serialized breakdown is self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillBreakdown {
    /// Energy term: consumption × price.
    pub energy_term_eur: f64,
    /// Power term: contracted kW × days × regulated toll.
    pub power_term_eur: f64,
    pub meter_rental_eur: f64,
    /// Sum of the three terms, before taxes.
    pub taxable_base_eur: f64,
    /// Electricity excise tax on the base.
    pub excise_tax_eur: f64,
    /// VAT on base plus excise.
    pub vat_eur: f64,
    pub total_eur: f64,
    pub consumption_kwh: f64,
    pub power_kw: f64,
    pub period_days: u32,
    /// Total divided by consumption; 0 when consumption is 0.
    pub effective_price_eur_kwh: f64,
}

/// One row of a tariff comparison, ordered by increasing total cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TariffComparison {
    pub tariff_name: String,
    pub price_eur_kwh: f64,
    pub breakdown: BillBreakdown,
    pub factor_vs_baseline: f64,
}
