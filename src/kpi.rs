//! KPI calculator: the headline indicators over the whole dataset.

use polars::prelude::*;
use tracing::debug;

use crate::aggregation::{area_reductions, count_values, first_max_by, scalar};
use crate::dataset::Dataset;
use crate::error::{FireError, Result};
use crate::grid::{aggregate_by_grid, GridCell};
use crate::monthly::month_groups;
use crate::reference::Month;
use crate::schema::summary;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireKpis {
    pub total_incidents: usize,
    pub area_total: f64,
    pub area_mean: f64,
    pub area_max: f64,
    /// Month with the most incidents.
    pub critical_month: Month,
    pub critical_month_count: usize,
    /// Grid cell with the largest summed burned area.
    pub critical_region: GridCell,
    pub critical_region_area: f64,
}

/// Compute the KPI set.
///
/// Ties for the critical month and region go to the key first seen in
/// dataset order.
pub fn kpis(dataset: &Dataset) -> Result<FireKpis> {
    dataset.ensure_non_empty()?;

    let totals = dataset
        .to_frame()?
        .lazy()
        .select(area_reductions())
        .collect()?;
    let total_incidents = count_values(&totals, summary::COUNT)?
        .first()
        .copied()
        .unwrap_or_default();

    let months = month_groups(dataset)?;
    let busiest = first_max_by(&months, |m| m.count as f64).ok_or(FireError::EmptyDataset)?;

    let cells = aggregate_by_grid(dataset)?;
    let critical = first_max_by(&cells, |c| c.area_sum).ok_or(FireError::EmptyDataset)?;

    let kpis = FireKpis {
        total_incidents,
        area_total: scalar(&totals, summary::AREA_SUM)?.unwrap_or(f64::NAN),
        area_mean: scalar(&totals, summary::AREA_MEAN)?.unwrap_or(f64::NAN),
        area_max: scalar(&totals, summary::AREA_MAX)?.unwrap_or(f64::NAN),
        critical_month: months[busiest].month,
        critical_month_count: months[busiest].count,
        critical_region: cells[critical].cell,
        critical_region_area: cells[critical].area_sum,
    };
    debug!(
        incidents = kpis.total_incidents,
        critical_month = %kpis.critical_month,
        critical_region = %kpis.critical_region,
        "computed fire KPIs"
    );
    Ok(kpis)
}
