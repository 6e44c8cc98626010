/// Column-name constants for the fire dashboard tables.
/// Single source of truth - exported to Python via PyO3.

// ── Fire incident columns (normalized, lower-case) ──────────────────────────
pub mod fire {
    pub const X: &str = "x";
    pub const Y: &str = "y";
    pub const MONTH: &str = "month";
    pub const DAY: &str = "day";
    pub const FFMC: &str = "ffmc";
    pub const DMC: &str = "dmc";
    pub const DC: &str = "dc";
    pub const ISI: &str = "isi";
    pub const TEMP: &str = "temp";
    pub const RH: &str = "rh";
    pub const WIND: &str = "wind";
    pub const RAIN: &str = "rain";
    pub const AREA: &str = "area";

    pub const REQUIRED: [&str; 13] = [
        X, Y, MONTH, DAY, FFMC, DMC, DC, ISI, TEMP, RH, WIND, RAIN, AREA,
    ];

    pub const INTEGER: [&str; 2] = [X, Y];

    pub const FLOAT: [&str; 9] = [FFMC, DMC, DC, ISI, TEMP, RH, WIND, RAIN, AREA];

    /// Variables entering the correlation matrix.
    pub const CORRELATED: [&str; 9] = [FFMC, DMC, DC, ISI, TEMP, RH, WIND, RAIN, AREA];
}

// ── Shared summary columns ──────────────────────────────────────────────────
pub mod summary {
    pub const COUNT: &str = "count";
    pub const AREA_SUM: &str = "area_sum";
    pub const AREA_MEAN: &str = "area_mean";
    pub const AREA_MAX: &str = "area_max";
    pub const TEMP_MEAN: &str = "temp_mean";
    pub const RH_MEAN: &str = "rh_mean";
    pub const FFMC_MEAN: &str = "ffmc_mean";
    pub const DMC_MEAN: &str = "dmc_mean";
    pub const DC_MEAN: &str = "dc_mean";
    pub const ISI_MEAN: &str = "isi_mean";
}

// ── Grid summary columns ────────────────────────────────────────────────────
pub mod grid {
    pub const X: &str = "x";
    pub const Y: &str = "y";
    pub const WIND_MEAN: &str = "wind_mean";
}

// ── Monthly summary columns ─────────────────────────────────────────────────
pub mod monthly {
    pub const MONTH: &str = "month";
    pub const MONTH_NAME: &str = "month_name";
    pub const AREA_STD: &str = "area_std";
}

// ── Descriptive statistics columns ──────────────────────────────────────────
pub mod describe {
    pub const VARIABLE: &str = "variable";
    pub const MIN: &str = "min";
    pub const MAX: &str = "max";
    pub const MEAN: &str = "mean";
    pub const STD: &str = "std";
}

// ── Sales template columns ──────────────────────────────────────────────────
pub mod sales {
    pub const DATE: &str = "date";
    pub const SALES: &str = "sales";
    pub const VISITORS: &str = "visitors";
    pub const CONVERSION: &str = "conversion";
}
