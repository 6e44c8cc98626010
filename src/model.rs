//! Python-facing classes wrapping the aggregation core.
//!
//! The dashboard pages hold one `FireModel` per session; every table comes
//! back as a polars DataFrame, every scalar result as a small frozen class.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use chrono::NaiveDate;
use pyo3::prelude::*;
use pyo3_polars::PyDataFrame;

use crate::cache::DatasetCache;
use crate::config::DataSourceConfig;
use crate::dataset::Dataset;
use crate::error::FireError;
use crate::grid::{self, AreaHeatmap, RankBy};
use crate::kpi::{self, FireKpis};
use crate::monthly::{self, SeasonalHighlights};
use crate::reference::{self, Month};
use crate::sales::{self, SalesKpis, SalesRecord};
use crate::stats;

/// Process-wide dataset cache shared by every model instance.
fn dataset_cache() -> &'static DatasetCache {
    static CACHE: OnceLock<DatasetCache> = OnceLock::new();
    CACHE.get_or_init(DatasetCache::new)
}

#[pyclass]
pub struct FireModel {
    config: DataSourceConfig,
    dataset: Option<Arc<Dataset>>,
}

#[pymethods]
impl FireModel {
    #[new]
    #[pyo3(signature = (base_path=None, fires_file=None))]
    fn new(base_path: Option<String>, fires_file: Option<String>) -> Self {
        let mut config = match base_path {
            Some(base) => DataSourceConfig::new(base),
            None => DataSourceConfig::from_env(),
        };
        if let Some(name) = fires_file {
            config = config.with_fires_file(name);
        }
        Self {
            config,
            dataset: None,
        }
    }

    /// Wrap an already-loaded (possibly filtered) frame.
    #[staticmethod]
    fn from_dataframe(df: PyDataFrame) -> PyResult<Self> {
        let dataset = Dataset::from_frame(df.0)?;
        Ok(Self {
            config: DataSourceConfig::new(PathBuf::new()),
            dataset: Some(Arc::new(dataset)),
        })
    }

    // ── Data loading ────────────────────────────────────────────────────────

    /// Load the fire dataset, at most once per path for the process.
    #[pyo3(signature = (filename=None))]
    fn load_forestfires(&mut self, filename: Option<&str>) -> PyResult<PyDataFrame> {
        let dataset = dataset_cache().get_or_load(self.source(filename).resolve())?;
        let df = dataset.to_frame()?;
        self.dataset = Some(dataset);
        Ok(PyDataFrame(df))
    }

    /// Load bypassing the shared cache.
    #[pyo3(signature = (filename=None))]
    fn reload_forestfires(&mut self, filename: Option<&str>) -> PyResult<PyDataFrame> {
        let dataset = Arc::new(self.source(filename).load()?);
        let df = dataset.to_frame()?;
        self.dataset = Some(dataset);
        Ok(PyDataFrame(df))
    }

    /// New model restricted to the given month codes.
    fn filter_months(&self, months: Vec<String>) -> PyResult<FireModel> {
        let months = months
            .iter()
            .map(|code| Month::parse_record(code))
            .collect::<Result<Vec<_>, _>>()?;
        let filtered = self.loaded()?.filter_months(&months);
        Ok(FireModel {
            config: self.config.clone(),
            dataset: Some(Arc::new(filtered)),
        })
    }

    // ── Core views ──────────────────────────────────────────────────────────

    fn kpis(&self) -> PyResult<PyFireKpis> {
        Ok(kpi::kpis(self.loaded()?)?.into())
    }

    fn aggregate_by_grid(&self) -> PyResult<PyDataFrame> {
        let cells = grid::aggregate_by_grid(self.loaded()?)?;
        Ok(PyDataFrame(grid::grid_frame(&cells)?))
    }

    fn aggregate_by_month(&self) -> PyResult<PyDataFrame> {
        let months = monthly::aggregate_by_month(self.loaded()?)?;
        Ok(PyDataFrame(monthly::monthly_frame(&months)?))
    }

    // ── Supplementary views ─────────────────────────────────────────────────

    /// Grid cells ranked by "area_total", "frequency" or "area_max".
    #[pyo3(signature = (by="area_total", limit=None))]
    fn rank_cells(&self, by: &str, limit: Option<usize>) -> PyResult<PyDataFrame> {
        let by = RankBy::parse(by)?;
        let cells = grid::aggregate_by_grid(self.loaded()?)?;
        let ranked = grid::rank_cells(&cells, by, limit);
        Ok(PyDataFrame(grid::grid_frame(&ranked)?))
    }

    fn area_heatmap(&self) -> PyResult<PyAreaHeatmap> {
        Ok(grid::area_heatmap(self.loaded()?)?.into())
    }

    fn seasonal_highlights(&self) -> PyResult<Option<PySeasonalHighlights>> {
        let months = monthly::aggregate_by_month(self.loaded()?)?;
        Ok(SeasonalHighlights::from_summaries(&months).map(Into::into))
    }

    fn describe(&self) -> PyResult<PyDataFrame> {
        let stats = stats::describe(self.loaded()?)?;
        Ok(PyDataFrame(stats::describe_frame(&stats)?))
    }

    fn correlation(&self) -> PyResult<PyDataFrame> {
        let matrix = stats::correlation_matrix(self.loaded()?)?;
        Ok(PyDataFrame(stats::correlation_frame(&matrix)?))
    }

    // ── Properties ──────────────────────────────────────────────────────────

    #[getter]
    fn source_path(&self) -> PathBuf {
        self.config.resolve()
    }

    #[getter]
    fn records_df(&self) -> PyResult<Option<PyDataFrame>> {
        self.dataset
            .as_ref()
            .map(|ds| ds.to_frame().map(PyDataFrame))
            .transpose()
            .map_err(Into::into)
    }

    fn __len__(&self) -> usize {
        self.dataset.as_ref().map_or(0, |ds| ds.len())
    }
}

impl FireModel {
    /// The configured source, or the same directory with another file name.
    fn source(&self, filename: Option<&str>) -> DataSourceConfig {
        match filename {
            Some(name) => self.config.clone().with_fires_file(name),
            None => self.config.clone(),
        }
    }

    fn loaded(&self) -> Result<&Dataset, FireError> {
        self.dataset
            .as_deref()
            .ok_or_else(|| FireError::InvalidArgument("fire dataset not loaded".into()))
    }
}

// ── Sales template ──────────────────────────────────────────────────────────

#[pyclass]
pub struct SalesModel {
    records: Vec<SalesRecord>,
}

#[pymethods]
impl SalesModel {
    #[new]
    #[pyo3(signature = (days=100, seed=0))]
    fn new(days: usize, seed: u64) -> PyResult<Self> {
        Ok(Self {
            records: sales::generate_sales(days, seed)?,
        })
    }

    fn filter_by_date(&self, start: NaiveDate, end: NaiveDate) -> PyResult<SalesModel> {
        Ok(SalesModel {
            records: sales::filter_by_date(&self.records, start, end)?,
        })
    }

    fn kpis(&self) -> PyResult<PySalesKpis> {
        Ok(sales::sales_kpis(&self.records)?.into())
    }

    #[getter]
    fn df(&self) -> PyResult<PyDataFrame> {
        Ok(PyDataFrame(sales::sales_frame(&self.records)?))
    }

    fn __len__(&self) -> usize {
        self.records.len()
    }
}

// ── Result classes ──────────────────────────────────────────────────────────

#[pyclass(name = "FireKpis", frozen)]
#[derive(Debug, Clone)]
pub struct PyFireKpis {
    #[pyo3(get)]
    total_incidents: usize,
    #[pyo3(get)]
    area_total: f64,
    #[pyo3(get)]
    area_mean: f64,
    #[pyo3(get)]
    area_max: f64,
    #[pyo3(get)]
    critical_month: String,
    #[pyo3(get)]
    critical_month_count: usize,
    #[pyo3(get)]
    critical_region: (i64, i64),
    #[pyo3(get)]
    critical_region_area: f64,
}

impl From<FireKpis> for PyFireKpis {
    fn from(k: FireKpis) -> Self {
        Self {
            total_incidents: k.total_incidents,
            area_total: k.area_total,
            area_mean: k.area_mean,
            area_max: k.area_max,
            critical_month: k.critical_month.code().to_string(),
            critical_month_count: k.critical_month_count,
            critical_region: (k.critical_region.x, k.critical_region.y),
            critical_region_area: k.critical_region_area,
        }
    }
}

#[pymethods]
impl PyFireKpis {
    fn __repr__(&self) -> String {
        format!(
            "FireKpis(incidents={}, area_total={:.2}, critical_month={}, critical_region=({}, {}))",
            self.total_incidents,
            self.area_total,
            self.critical_month,
            self.critical_region.0,
            self.critical_region.1
        )
    }
}

#[pyclass(name = "SeasonalHighlights", frozen)]
#[derive(Debug, Clone)]
pub struct PySeasonalHighlights {
    #[pyo3(get)]
    busiest: String,
    #[pyo3(get)]
    busiest_count: usize,
    #[pyo3(get)]
    most_burned: String,
    #[pyo3(get)]
    most_burned_area: f64,
    #[pyo3(get)]
    hottest: String,
    #[pyo3(get)]
    hottest_temp: f64,
}

impl From<SeasonalHighlights> for PySeasonalHighlights {
    fn from(h: SeasonalHighlights) -> Self {
        Self {
            busiest: h.busiest.code().to_string(),
            busiest_count: h.busiest_count,
            most_burned: h.most_burned.code().to_string(),
            most_burned_area: h.most_burned_area,
            hottest: h.hottest.code().to_string(),
            hottest_temp: h.hottest_temp,
        }
    }
}

#[pyclass(name = "AreaHeatmap", frozen)]
#[derive(Debug, Clone)]
pub struct PyAreaHeatmap {
    #[pyo3(get)]
    xs: Vec<i64>,
    #[pyo3(get)]
    ys: Vec<i64>,
    #[pyo3(get)]
    values: Vec<Vec<f64>>,
}

impl From<AreaHeatmap> for PyAreaHeatmap {
    fn from(m: AreaHeatmap) -> Self {
        Self {
            xs: m.xs,
            ys: m.ys,
            values: m.values,
        }
    }
}

#[pyclass(name = "SalesKpis", frozen)]
#[derive(Debug, Clone)]
pub struct PySalesKpis {
    #[pyo3(get)]
    total_sales: i64,
    #[pyo3(get)]
    mean_sales: f64,
    #[pyo3(get)]
    total_visitors: i64,
    #[pyo3(get)]
    mean_visitors: f64,
    #[pyo3(get)]
    conversion_mean: f64,
    #[pyo3(get)]
    conversion_std: Option<f64>,
    #[pyo3(get)]
    days: usize,
}

impl From<SalesKpis> for PySalesKpis {
    fn from(k: SalesKpis) -> Self {
        Self {
            total_sales: k.total_sales,
            mean_sales: k.mean_sales,
            total_visitors: k.total_visitors,
            mean_visitors: k.mean_visitors,
            conversion_mean: k.conversion_mean,
            conversion_std: k.conversion_std,
            days: k.days,
        }
    }
}

#[pyclass(name = "IndexInfo", frozen)]
#[derive(Debug, Clone)]
pub struct PyIndexInfo {
    #[pyo3(get)]
    code: String,
    #[pyo3(get)]
    name: String,
    #[pyo3(get)]
    depth: String,
    #[pyo3(get)]
    description: String,
    #[pyo3(get)]
    interpretation: String,
    #[pyo3(get)]
    range: (f64, f64),
}

#[pyclass(name = "WeatherInfo", frozen)]
#[derive(Debug, Clone)]
pub struct PyWeatherInfo {
    #[pyo3(get)]
    code: String,
    #[pyo3(get)]
    name: String,
    #[pyo3(get)]
    unit: String,
    #[pyo3(get)]
    interpretation: String,
}

// ── Reference lookups ───────────────────────────────────────────────────────

#[pyfunction]
pub fn month_name(code: &str) -> PyResult<&'static str> {
    Ok(reference::month_name(code)?)
}

#[pyfunction]
pub fn month_order() -> Vec<&'static str> {
    reference::MONTH_ORDER.iter().map(|m| m.code()).collect()
}

#[pyfunction]
pub fn fwi_info(key: &str) -> PyResult<PyIndexInfo> {
    let info = reference::fwi_info(key)?;
    Ok(PyIndexInfo {
        code: info.code.to_string(),
        name: info.name.to_string(),
        depth: info.depth.to_string(),
        description: info.description.to_string(),
        interpretation: info.interpretation.to_string(),
        range: info.range,
    })
}

#[pyfunction]
pub fn weather_info(key: &str) -> PyResult<PyWeatherInfo> {
    let info = reference::weather_info(key)?;
    Ok(PyWeatherInfo {
        code: info.code.to_string(),
        name: info.name.to_string(),
        unit: info.unit.to_string(),
        interpretation: info.interpretation.to_string(),
    })
}
