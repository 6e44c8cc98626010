//! Grid aggregator: per-cell summaries over the park's (x, y) grid, plus
//! the ranking and heatmap views built on them.

use std::fmt;

use polars::prelude::*;
use tracing::debug;

use crate::aggregation::{
    area_reductions, count_values, f64_values, group_stable, i64_values, weather_means,
};
use crate::dataset::Dataset;
use crate::error::{FireError, Result};
use crate::schema::{fire, grid, summary};

/// A spatial zone of the monitored area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridCell {
    pub x: i64,
    pub y: i64,
}

impl GridCell {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridCellSummary {
    pub cell: GridCell,
    pub count: usize,
    pub area_sum: f64,
    pub area_mean: f64,
    pub area_max: f64,
    pub temp_mean: f64,
    pub rh_mean: f64,
    pub wind_mean: f64,
    pub ffmc_mean: f64,
    pub dmc_mean: f64,
    pub dc_mean: f64,
    pub isi_mean: f64,
}

/// One summary per distinct cell, in first-appearance order.
///
/// Every record's month must be canonical, even though the grouping does
/// not use it.
pub fn aggregate_by_grid(dataset: &Dataset) -> Result<Vec<GridCellSummary>> {
    dataset.ensure_non_empty()?;
    for record in dataset.records() {
        record.month()?;
    }

    let mut aggs = area_reductions();
    aggs.extend(weather_means());
    aggs.push(col(fire::WIND).mean().alias(grid::WIND_MEAN));
    let df = group_stable(dataset.to_frame()?, &[fire::X, fire::Y], aggs)?;

    let xs = i64_values(&df, fire::X)?;
    let ys = i64_values(&df, fire::Y)?;
    let counts = count_values(&df, summary::COUNT)?;
    let area_sum = f64_values(&df, summary::AREA_SUM)?;
    let area_mean = f64_values(&df, summary::AREA_MEAN)?;
    let area_max = f64_values(&df, summary::AREA_MAX)?;
    let temp = f64_values(&df, summary::TEMP_MEAN)?;
    let rh = f64_values(&df, summary::RH_MEAN)?;
    let wind = f64_values(&df, grid::WIND_MEAN)?;
    let ffmc = f64_values(&df, summary::FFMC_MEAN)?;
    let dmc = f64_values(&df, summary::DMC_MEAN)?;
    let dc = f64_values(&df, summary::DC_MEAN)?;
    let isi = f64_values(&df, summary::ISI_MEAN)?;

    let summaries: Vec<GridCellSummary> = (0..df.height())
        .map(|i| GridCellSummary {
            cell: GridCell::new(xs[i], ys[i]),
            count: counts[i],
            area_sum: area_sum[i],
            area_mean: area_mean[i],
            area_max: area_max[i],
            temp_mean: temp[i],
            rh_mean: rh[i],
            wind_mean: wind[i],
            ffmc_mean: ffmc[i],
            dmc_mean: dmc[i],
            dc_mean: dc[i],
            isi_mean: isi[i],
        })
        .collect();

    debug!(cells = summaries.len(), "aggregated fires by grid cell");
    Ok(summaries)
}

/// Statistic used to rank grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBy {
    AreaTotal,
    Frequency,
    AreaMax,
}

impl RankBy {
    pub fn parse(key: &str) -> Result<Self> {
        match key {
            "area_total" | summary::AREA_SUM => Ok(Self::AreaTotal),
            "frequency" | summary::COUNT => Ok(Self::Frequency),
            summary::AREA_MAX => Ok(Self::AreaMax),
            _ => Err(FireError::InvalidArgument(format!(
                "Invalid rank criterion: '{key}'. Must be 'area_total', 'frequency' or 'area_max'"
            ))),
        }
    }

    fn value(self, s: &GridCellSummary) -> f64 {
        match self {
            Self::AreaTotal => s.area_sum,
            Self::Frequency => s.count as f64,
            Self::AreaMax => s.area_max,
        }
    }
}

/// Cells sorted descending by the chosen statistic; ties keep input order.
pub fn rank_cells(
    summaries: &[GridCellSummary],
    by: RankBy,
    limit: Option<usize>,
) -> Vec<GridCellSummary> {
    let mut ranked = summaries.to_vec();
    ranked.sort_by(|a, b| by.value(b).total_cmp(&by.value(a)));
    if let Some(n) = limit {
        ranked.truncate(n);
    }
    ranked
}

/// Summed burned area pivoted into a y-by-x matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaHeatmap {
    /// Column labels, ascending.
    pub xs: Vec<i64>,
    /// Row labels, ascending.
    pub ys: Vec<i64>,
    /// `values[row][col]`, 0.0 where no fire was recorded.
    pub values: Vec<Vec<f64>>,
}

impl AreaHeatmap {
    pub fn from_summaries(summaries: &[GridCellSummary]) -> Self {
        let mut xs: Vec<i64> = summaries.iter().map(|s| s.cell.x).collect();
        let mut ys: Vec<i64> = summaries.iter().map(|s| s.cell.y).collect();
        xs.sort_unstable();
        xs.dedup();
        ys.sort_unstable();
        ys.dedup();

        let mut values = vec![vec![0.0; xs.len()]; ys.len()];
        for s in summaries {
            // both searches hit: the axes were built from these cells
            if let (Ok(row), Ok(col)) = (ys.binary_search(&s.cell.y), xs.binary_search(&s.cell.x)) {
                values[row][col] += s.area_sum;
            }
        }
        Self { xs, ys, values }
    }

    pub fn value_at(&self, cell: GridCell) -> Option<f64> {
        let row = self.ys.binary_search(&cell.y).ok()?;
        let col = self.xs.binary_search(&cell.x).ok()?;
        Some(self.values[row][col])
    }
}

pub fn area_heatmap(dataset: &Dataset) -> Result<AreaHeatmap> {
    Ok(AreaHeatmap::from_summaries(&aggregate_by_grid(dataset)?))
}

/// Tabular view of grid summaries for the Python side.
pub fn grid_frame(summaries: &[GridCellSummary]) -> Result<DataFrame> {
    let f = |get: fn(&GridCellSummary) -> f64| summaries.iter().map(get).collect::<Vec<f64>>();
    let columns: Vec<Column> = vec![
        Series::new(grid::X.into(), summaries.iter().map(|s| s.cell.x).collect::<Vec<_>>()).into(),
        Series::new(grid::Y.into(), summaries.iter().map(|s| s.cell.y).collect::<Vec<_>>()).into(),
        Series::new(
            summary::COUNT.into(),
            summaries.iter().map(|s| s.count as u64).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(summary::AREA_SUM.into(), f(|s| s.area_sum)).into(),
        Series::new(summary::AREA_MEAN.into(), f(|s| s.area_mean)).into(),
        Series::new(summary::AREA_MAX.into(), f(|s| s.area_max)).into(),
        Series::new(summary::TEMP_MEAN.into(), f(|s| s.temp_mean)).into(),
        Series::new(summary::RH_MEAN.into(), f(|s| s.rh_mean)).into(),
        Series::new(grid::WIND_MEAN.into(), f(|s| s.wind_mean)).into(),
        Series::new(summary::FFMC_MEAN.into(), f(|s| s.ffmc_mean)).into(),
        Series::new(summary::DMC_MEAN.into(), f(|s| s.dmc_mean)).into(),
        Series::new(summary::DC_MEAN.into(), f(|s| s.dc_mean)).into(),
        Series::new(summary::ISI_MEAN.into(), f(|s| s.isi_mean)).into(),
    ];
    Ok(DataFrame::new(columns)?)
}
