//! Static reference tables: canonical months and the descriptive metadata
//! shown next to fire-danger indices and weather variables.

use std::fmt;

use crate::error::{FireError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

/// Canonical month ordering, January through December.
pub const MONTH_ORDER: [Month; 12] = [
    Month::Jan,
    Month::Feb,
    Month::Mar,
    Month::Apr,
    Month::May,
    Month::Jun,
    Month::Jul,
    Month::Aug,
    Month::Sep,
    Month::Oct,
    Month::Nov,
    Month::Dec,
];

impl Month {
    /// Three-letter lower-case code as it appears in the dataset.
    pub fn code(self) -> &'static str {
        match self {
            Self::Jan => "jan",
            Self::Feb => "feb",
            Self::Mar => "mar",
            Self::Apr => "apr",
            Self::May => "may",
            Self::Jun => "jun",
            Self::Jul => "jul",
            Self::Aug => "aug",
            Self::Sep => "sep",
            Self::Oct => "oct",
            Self::Nov => "nov",
            Self::Dec => "dec",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Self::Jan => "January",
            Self::Feb => "February",
            Self::Mar => "March",
            Self::Apr => "April",
            Self::May => "May",
            Self::Jun => "June",
            Self::Jul => "July",
            Self::Aug => "August",
            Self::Sep => "September",
            Self::Oct => "October",
            Self::Nov => "November",
            Self::Dec => "December",
        }
    }

    /// Zero-based position in [`MONTH_ORDER`].
    pub fn canonical_index(self) -> usize {
        self as usize
    }

    /// Exact match against the twelve lower-case codes.
    pub fn from_code(code: &str) -> Option<Self> {
        MONTH_ORDER.into_iter().find(|m| m.code() == code)
    }

    /// Month of a record; anything outside the canonical set is rejected.
    pub fn parse_record(code: &str) -> Result<Self> {
        Self::from_code(code).ok_or_else(|| FireError::UnknownMonth(code.to_string()))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Month-code to display-name lookup.
pub fn month_name(code: &str) -> Result<&'static str> {
    Month::from_code(code)
        .map(Month::full_name)
        .ok_or_else(|| FireError::UnknownKey(code.to_string()))
}

// ── Fire Weather Index components ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FwiIndex {
    Ffmc,
    Dmc,
    Dc,
    Isi,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexInfo {
    pub code: &'static str,
    pub name: &'static str,
    /// Nominal fuel layer the index tracks.
    pub depth: &'static str,
    pub description: &'static str,
    pub interpretation: &'static str,
    /// Observed (min, max) in the Montesinho records.
    pub range: (f64, f64),
}

pub const FWI_INDICES: [FwiIndex; 4] = [FwiIndex::Ffmc, FwiIndex::Dmc, FwiIndex::Dc, FwiIndex::Isi];

const FFMC_INFO: IndexInfo = IndexInfo {
    code: "FFMC",
    name: "Fine Fuel Moisture Code",
    depth: "1-2 cm",
    description: "Moisture content of surface litter and other cured fine fuels.",
    interpretation: "Higher values mean drier fine fuels and easier ignition; above 90 is high danger.",
    range: (18.7, 96.2),
};

const DMC_INFO: IndexInfo = IndexInfo {
    code: "DMC",
    name: "Duff Moisture Code",
    depth: "5-10 cm",
    description: "Moisture content of loosely compacted organic layers of moderate depth.",
    interpretation: "Higher values indicate drier duff and a greater chance of lightning ignitions.",
    range: (1.1, 291.3),
};

const DC_INFO: IndexInfo = IndexInfo {
    code: "DC",
    name: "Drought Code",
    depth: "10-20 cm",
    description: "Moisture content of deep, compact organic layers; tracks seasonal drought.",
    interpretation: "Higher values indicate long-term dryness and deep-burning, hard-to-extinguish fires.",
    range: (7.9, 860.6),
};

const ISI_INFO: IndexInfo = IndexInfo {
    code: "ISI",
    name: "Initial Spread Index",
    depth: "surface",
    description: "Expected rate of fire spread, combining wind speed with FFMC.",
    interpretation: "Higher values mean faster initial spread; above 10 spreads rapidly.",
    range: (0.0, 56.1),
};

impl FwiIndex {
    pub fn info(self) -> &'static IndexInfo {
        match self {
            Self::Ffmc => &FFMC_INFO,
            Self::Dmc => &DMC_INFO,
            Self::Dc => &DC_INFO,
            Self::Isi => &ISI_INFO,
        }
    }
}

/// Case-insensitive lookup by index code ("FFMC", "dmc", ...).
pub fn fwi_info(key: &str) -> Result<&'static IndexInfo> {
    FWI_INDICES
        .into_iter()
        .find(|i| i.info().code.eq_ignore_ascii_case(key))
        .map(FwiIndex::info)
        .ok_or_else(|| FireError::UnknownKey(key.to_string()))
}

// ── Weather variables ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherVariable {
    Temp,
    Rh,
    Wind,
    Rain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
    pub interpretation: &'static str,
}

pub const WEATHER_VARIABLES: [WeatherVariable; 4] = [
    WeatherVariable::Temp,
    WeatherVariable::Rh,
    WeatherVariable::Wind,
    WeatherVariable::Rain,
];

impl WeatherVariable {
    pub fn info(self) -> &'static WeatherInfo {
        const TEMP: WeatherInfo = WeatherInfo {
            code: "temp",
            name: "Temperature",
            unit: "°C",
            interpretation: "Hotter air dries fuels and raises ignition probability.",
        };
        const RH: WeatherInfo = WeatherInfo {
            code: "RH",
            name: "Relative humidity",
            unit: "%",
            interpretation: "Low humidity dries fine fuels quickly; below 30% is critical.",
        };
        const WIND: WeatherInfo = WeatherInfo {
            code: "wind",
            name: "Wind speed",
            unit: "km/h",
            interpretation: "Stronger wind feeds oxygen and pushes the fire front forward.",
        };
        const RAIN: WeatherInfo = WeatherInfo {
            code: "rain",
            name: "Rainfall",
            unit: "mm/m²",
            interpretation: "Recent rain wets fuels and suppresses ignition.",
        };
        match self {
            Self::Temp => &TEMP,
            Self::Rh => &RH,
            Self::Wind => &WIND,
            Self::Rain => &RAIN,
        }
    }
}

/// Case-insensitive lookup by variable code ("temp", "RH", ...).
pub fn weather_info(key: &str) -> Result<&'static WeatherInfo> {
    WEATHER_VARIABLES
        .into_iter()
        .find(|v| v.info().code.eq_ignore_ascii_case(key))
        .map(WeatherVariable::info)
        .ok_or_else(|| FireError::UnknownKey(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_order_matches_enum_discriminants() {
        for (i, m) in MONTH_ORDER.iter().enumerate() {
            assert_eq!(m.canonical_index(), i);
            assert_eq!(Month::from_code(m.code()), Some(*m));
        }
    }

    #[test]
    fn month_codes_are_exact_lower_case() {
        assert_eq!(Month::from_code("aug"), Some(Month::Aug));
        assert_eq!(Month::from_code("Aug"), None);
        assert!(matches!(
            Month::parse_record("xyz"),
            Err(FireError::UnknownMonth(code)) if code == "xyz"
        ));
    }

    #[test]
    fn month_name_lookup() {
        assert_eq!(month_name("sep").unwrap(), "September");
        assert!(matches!(month_name("sept"), Err(FireError::UnknownKey(_))));
    }

    #[test]
    fn fwi_table_has_exactly_four_indices() {
        let codes: Vec<_> = FWI_INDICES.iter().map(|i| i.info().code).collect();
        assert_eq!(codes, ["FFMC", "DMC", "DC", "ISI"]);
        assert_eq!(fwi_info("dc").unwrap().name, "Drought Code");
        assert!(matches!(fwi_info("FWI"), Err(FireError::UnknownKey(_))));
    }

    #[test]
    fn weather_lookup_is_case_insensitive() {
        assert_eq!(weather_info("rh").unwrap().unit, "%");
        assert_eq!(weather_info("RH").unwrap().name, "Relative humidity");
        assert!(weather_info("area").is_err());
    }
}
