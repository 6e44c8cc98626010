//! Monthly aggregator: per-month summaries in calendar order, and the
//! seasonal highlights derived from them.

use polars::prelude::*;
use tracing::debug;

use crate::aggregation::{
    area_reductions, count_values, f64_values, first_max_by, group_stable, opt_f64_values,
    str_values, weather_means,
};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::reference::Month;
use crate::schema::{fire, monthly, summary};

#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub month: Month,
    pub count: usize,
    pub area_sum: f64,
    pub area_mean: f64,
    pub area_max: f64,
    /// Sample standard deviation; `None` for a single-fire month.
    pub area_std: Option<f64>,
    pub temp_mean: f64,
    pub rh_mean: f64,
    pub ffmc_mean: f64,
    pub dmc_mean: f64,
    pub dc_mean: f64,
    pub isi_mean: f64,
}

/// One summary per month present, ordered January through December.
///
/// An empty dataset yields an empty vector; an unknown month code fails the
/// whole call.
pub fn aggregate_by_month(dataset: &Dataset) -> Result<Vec<MonthSummary>> {
    let mut summaries = month_groups(dataset)?;
    summaries.sort_by_key(|s| s.month.canonical_index());

    debug!(months = summaries.len(), "aggregated fires by month");
    Ok(summaries)
}

/// Month summaries in first-appearance order.
///
/// The first unknown code in dataset order is the one reported.
pub(crate) fn month_groups(dataset: &Dataset) -> Result<Vec<MonthSummary>> {
    let mut aggs = area_reductions();
    aggs.push(col(fire::AREA).std(1).alias(monthly::AREA_STD));
    aggs.extend(weather_means());
    let df = group_stable(dataset.to_frame()?, &[fire::MONTH], aggs)?;

    let months = str_values(&df, fire::MONTH)?
        .iter()
        .map(|code| Month::parse_record(code))
        .collect::<Result<Vec<_>>>()?;
    let counts = count_values(&df, summary::COUNT)?;
    let area_sum = f64_values(&df, summary::AREA_SUM)?;
    let area_mean = f64_values(&df, summary::AREA_MEAN)?;
    let area_max = f64_values(&df, summary::AREA_MAX)?;
    let area_std = opt_f64_values(&df, monthly::AREA_STD)?;
    let temp = f64_values(&df, summary::TEMP_MEAN)?;
    let rh = f64_values(&df, summary::RH_MEAN)?;
    let ffmc = f64_values(&df, summary::FFMC_MEAN)?;
    let dmc = f64_values(&df, summary::DMC_MEAN)?;
    let dc = f64_values(&df, summary::DC_MEAN)?;
    let isi = f64_values(&df, summary::ISI_MEAN)?;

    Ok(months
        .into_iter()
        .enumerate()
        .map(|(i, month)| MonthSummary {
            month,
            count: counts[i],
            area_sum: area_sum[i],
            area_mean: area_mean[i],
            area_max: area_max[i],
            // a single fire has no spread
            area_std: area_std[i].filter(|s| !s.is_nan()),
            temp_mean: temp[i],
            rh_mean: rh[i],
            ffmc_mean: ffmc[i],
            dmc_mean: dmc[i],
            dc_mean: dc[i],
            isi_mean: isi[i],
        })
        .collect())
}

/// Months standing out in the seasonal profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalHighlights {
    pub busiest: Month,
    pub busiest_count: usize,
    pub most_burned: Month,
    pub most_burned_area: f64,
    pub hottest: Month,
    pub hottest_temp: f64,
}

impl SeasonalHighlights {
    /// `None` when no month is present. Ties go to the earlier month.
    pub fn from_summaries(summaries: &[MonthSummary]) -> Option<Self> {
        let busiest = &summaries[first_max_by(summaries, |s| s.count as f64)?];
        let burned = &summaries[first_max_by(summaries, |s| s.area_sum)?];
        let hottest = &summaries[first_max_by(summaries, |s| s.temp_mean)?];
        Some(Self {
            busiest: busiest.month,
            busiest_count: busiest.count,
            most_burned: burned.month,
            most_burned_area: burned.area_sum,
            hottest: hottest.month,
            hottest_temp: hottest.temp_mean,
        })
    }
}

/// Tabular view of month summaries for the Python side.
pub fn monthly_frame(summaries: &[MonthSummary]) -> Result<DataFrame> {
    let f = |get: fn(&MonthSummary) -> f64| summaries.iter().map(get).collect::<Vec<f64>>();
    let codes: Vec<&str> = summaries.iter().map(|s| s.month.code()).collect();
    let names: Vec<&str> = summaries.iter().map(|s| s.month.full_name()).collect();
    let stds: Vec<Option<f64>> = summaries.iter().map(|s| s.area_std).collect();

    let columns: Vec<Column> = vec![
        Series::new(monthly::MONTH.into(), codes).into(),
        Series::new(monthly::MONTH_NAME.into(), names).into(),
        Series::new(
            summary::COUNT.into(),
            summaries.iter().map(|s| s.count as u64).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(summary::AREA_SUM.into(), f(|s| s.area_sum)).into(),
        Series::new(summary::AREA_MEAN.into(), f(|s| s.area_mean)).into(),
        Series::new(summary::AREA_MAX.into(), f(|s| s.area_max)).into(),
        Series::new(monthly::AREA_STD.into(), stds).into(),
        Series::new(summary::TEMP_MEAN.into(), f(|s| s.temp_mean)).into(),
        Series::new(summary::RH_MEAN.into(), f(|s| s.rh_mean)).into(),
        Series::new(summary::FFMC_MEAN.into(), f(|s| s.ffmc_mean)).into(),
        Series::new(summary::DMC_MEAN.into(), f(|s| s.dmc_mean)).into(),
        Series::new(summary::DC_MEAN.into(), f(|s| s.dc_mean)).into(),
        Series::new(summary::ISI_MEAN.into(), f(|s| s.isi_mean)).into(),
    ];
    Ok(DataFrame::new(columns)?)
}
