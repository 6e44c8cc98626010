//! Synthetic sales template: the same KPI/table pattern as the fire pages,
//! over generated daily sales data.

use chrono::{Days, NaiveDate};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::aggregation::{i64_values, scalar};
use crate::error::{FireError, Result};
use crate::schema::sales;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub sales: i64,
    pub visitors: i64,
    /// Fraction of visitors converting, in [0.01, 0.1).
    pub conversion: f64,
}

fn start_date() -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .ok_or_else(|| FireError::InvalidArgument("invalid template start date".into()))
}

/// One record per day starting 2024-01-01, reproducible for a given seed.
pub fn generate_sales(days: usize, seed: u64) -> Result<Vec<SalesRecord>> {
    let start = start_date()?;
    let mut rng = StdRng::seed_from_u64(seed);
    (0..days)
        .map(|i| {
            let date = start
                .checked_add_days(Days::new(i as u64))
                .ok_or_else(|| FireError::InvalidArgument(format!("{days} days overflow the calendar")))?;
            Ok(SalesRecord {
                date,
                sales: rng.random_range(100..500),
                visitors: rng.random_range(1000..5000),
                conversion: rng.random_range(0.01..0.1),
            })
        })
        .collect()
}

/// Records with `start <= date <= end`.
pub fn filter_by_date(
    records: &[SalesRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<SalesRecord>> {
    if start > end {
        return Err(FireError::InvalidArgument(format!(
            "start date {start} is after end date {end}"
        )));
    }
    Ok(records
        .iter()
        .filter(|r| r.date >= start && r.date <= end)
        .copied()
        .collect())
}

const TOTAL_SALES: &str = "total_sales";
const MEAN_SALES: &str = "mean_sales";
const TOTAL_VISITORS: &str = "total_visitors";
const MEAN_VISITORS: &str = "mean_visitors";
const CONVERSION_MEAN: &str = "conversion_mean";
const CONVERSION_STD: &str = "conversion_std";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalesKpis {
    pub total_sales: i64,
    pub mean_sales: f64,
    pub total_visitors: i64,
    pub mean_visitors: f64,
    pub conversion_mean: f64,
    pub conversion_std: Option<f64>,
    pub days: usize,
}

pub fn sales_kpis(records: &[SalesRecord]) -> Result<SalesKpis> {
    if records.is_empty() {
        return Err(FireError::EmptyDataset);
    }
    let row = sales_frame(records)?
        .lazy()
        .select([
            col(sales::SALES).sum().alias(TOTAL_SALES),
            col(sales::SALES).cast(DataType::Float64).mean().alias(MEAN_SALES),
            col(sales::VISITORS).sum().alias(TOTAL_VISITORS),
            col(sales::VISITORS)
                .cast(DataType::Float64)
                .mean()
                .alias(MEAN_VISITORS),
            col(sales::CONVERSION).mean().alias(CONVERSION_MEAN),
            col(sales::CONVERSION).std(1).alias(CONVERSION_STD),
        ])
        .collect()?;
    let total = |name: &str| -> Result<i64> {
        Ok(i64_values(&row, name)?.first().copied().unwrap_or_default())
    };

    debug!(days = records.len(), "computed sales KPIs");
    Ok(SalesKpis {
        total_sales: total(TOTAL_SALES)?,
        mean_sales: scalar(&row, MEAN_SALES)?.unwrap_or(f64::NAN),
        total_visitors: total(TOTAL_VISITORS)?,
        mean_visitors: scalar(&row, MEAN_VISITORS)?.unwrap_or(f64::NAN),
        conversion_mean: scalar(&row, CONVERSION_MEAN)?.unwrap_or(f64::NAN),
        conversion_std: scalar(&row, CONVERSION_STD)?.filter(|s| !s.is_nan()),
        days: records.len(),
    })
}

pub fn sales_frame(records: &[SalesRecord]) -> Result<DataFrame> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
        .ok_or_else(|| FireError::InvalidArgument("invalid epoch".into()))?;
    let days: Vec<i32> = records
        .iter()
        .map(|r| (r.date - epoch).num_days() as i32)
        .collect();

    let columns: Vec<Column> = vec![
        Series::new(sales::DATE.into(), days)
            .cast(&DataType::Date)?
            .into(),
        Series::new(
            sales::SALES.into(),
            records.iter().map(|r| r.sales).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            sales::VISITORS.into(),
            records.iter().map(|r| r.visitors).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            sales::CONVERSION.into(),
            records.iter().map(|r| r.conversion).collect::<Vec<_>>(),
        )
        .into(),
    ];
    Ok(DataFrame::new(columns)?)
}
