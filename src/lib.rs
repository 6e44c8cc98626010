//! Aggregation core of the Montesinho forest-fire dashboard.
//!
//! Loads the fire-incident table once, then derives KPI summaries and
//! per-cell / per-month aggregates as pure functions over the immutable
//! [`Dataset`]. The `python` feature exposes the same operations to the
//! dashboard pages as the `_core` extension module.

pub mod aggregation;
pub mod cache;
pub mod config;
pub mod dataset;
pub mod error;
pub mod grid;
pub mod kpi;
pub mod monthly;
pub mod reference;
pub mod sales;
pub mod schema;
pub mod stats;

#[cfg(feature = "python")]
mod model;

pub use cache::DatasetCache;
pub use config::DataSourceConfig;
pub use dataset::{Dataset, FireRecord};
pub use error::{FireError, Result};
pub use grid::{aggregate_by_grid, GridCell, GridCellSummary};
pub use kpi::{kpis, FireKpis};
pub use monthly::{aggregate_by_month, MonthSummary};
pub use reference::{Month, MONTH_ORDER};

/// Load a fire-incident file.
pub fn load(path: impl AsRef<std::path::Path>) -> Result<Dataset> {
    Dataset::load(path)
}

#[cfg(feature = "python")]
mod python {
    use pyo3::prelude::*;
    use pyo3::types::PyModule;

    use crate::error::py::{EmptyDatasetError, LoadError, UnknownKeyError, UnknownMonthError};
    use crate::model::{self, FireModel, SalesModel};
    use crate::schema;

    /// Export schema constants as Python submodules
    fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Fire records
        let fire = PyModule::new(m.py(), "fire")?;
        fire.add("X", schema::fire::X)?;
        fire.add("Y", schema::fire::Y)?;
        fire.add("MONTH", schema::fire::MONTH)?;
        fire.add("DAY", schema::fire::DAY)?;
        fire.add("AREA", schema::fire::AREA)?;
        fire.add("REQUIRED", schema::fire::REQUIRED.to_vec())?;
        fire.add("CORRELATED", schema::fire::CORRELATED.to_vec())?;
        m.add_submodule(&fire)?;

        // Grid summaries
        let grid = PyModule::new(m.py(), "grid")?;
        grid.add("X", schema::grid::X)?;
        grid.add("Y", schema::grid::Y)?;
        grid.add("COUNT", schema::summary::COUNT)?;
        grid.add("AREA_SUM", schema::summary::AREA_SUM)?;
        grid.add("AREA_MEAN", schema::summary::AREA_MEAN)?;
        grid.add("AREA_MAX", schema::summary::AREA_MAX)?;
        grid.add("WIND_MEAN", schema::grid::WIND_MEAN)?;
        m.add_submodule(&grid)?;

        // Monthly summaries
        let monthly = PyModule::new(m.py(), "monthly")?;
        monthly.add("MONTH", schema::monthly::MONTH)?;
        monthly.add("MONTH_NAME", schema::monthly::MONTH_NAME)?;
        monthly.add("COUNT", schema::summary::COUNT)?;
        monthly.add("AREA_SUM", schema::summary::AREA_SUM)?;
        monthly.add("AREA_STD", schema::monthly::AREA_STD)?;
        monthly.add("TEMP_MEAN", schema::summary::TEMP_MEAN)?;
        m.add_submodule(&monthly)?;

        // Sales template
        let sales = PyModule::new(m.py(), "sales")?;
        sales.add("DATE", schema::sales::DATE)?;
        sales.add("SALES", schema::sales::SALES)?;
        sales.add("VISITORS", schema::sales::VISITORS)?;
        sales.add("CONVERSION", schema::sales::CONVERSION)?;
        m.add_submodule(&sales)?;

        Ok(())
    }

    #[pymodule]
    #[pyo3(name = "_core")]
    fn firedash_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_class::<FireModel>()?;
        m.add_class::<SalesModel>()?;
        m.add_class::<model::PyFireKpis>()?;
        m.add_class::<model::PySeasonalHighlights>()?;
        m.add_class::<model::PyAreaHeatmap>()?;
        m.add_class::<model::PySalesKpis>()?;
        m.add_class::<model::PyIndexInfo>()?;
        m.add_class::<model::PyWeatherInfo>()?;

        m.add_function(wrap_pyfunction!(model::month_name, m)?)?;
        m.add_function(wrap_pyfunction!(model::month_order, m)?)?;
        m.add_function(wrap_pyfunction!(model::fwi_info, m)?)?;
        m.add_function(wrap_pyfunction!(model::weather_info, m)?)?;

        let py = m.py();
        m.add("LoadError", py.get_type::<LoadError>())?;
        m.add("EmptyDatasetError", py.get_type::<EmptyDatasetError>())?;
        m.add("UnknownMonthError", py.get_type::<UnknownMonthError>())?;
        m.add("UnknownKeyError", py.get_type::<UnknownKeyError>())?;

        add_schema_exports(m)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::dataset::{Dataset, FireRecord};

    pub fn record(x: i64, y: i64, month: &str, area: f64) -> FireRecord {
        FireRecord {
            x,
            y,
            month: month.to_string(),
            day: "fri".to_string(),
            ffmc: 90.0,
            dmc: 35.0,
            dc: 600.0,
            isi: 8.0,
            temp: 18.0,
            rh: 45.0,
            wind: 4.0,
            rain: 0.0,
            area,
        }
    }

    pub fn dataset(records: Vec<FireRecord>) -> Dataset {
        Dataset::from_records(records)
    }
}
