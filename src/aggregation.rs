//! Shared polars plumbing for the KPI calculator and both aggregators:
//! stable group-by over the record frame, the reductions every summary
//! carries, and typed extraction of result columns.

use polars::prelude::*;

use crate::error::Result;
use crate::schema::{fire, summary};

/// Incident count plus sum, mean and max of burned area.
pub fn area_reductions() -> Vec<Expr> {
    vec![
        len().alias(summary::COUNT),
        col(fire::AREA).sum().alias(summary::AREA_SUM),
        col(fire::AREA).mean().alias(summary::AREA_MEAN),
        col(fire::AREA).max().alias(summary::AREA_MAX),
    ]
}

/// Mean of every fire-danger index and of temperature and humidity.
pub fn weather_means() -> Vec<Expr> {
    [
        (fire::TEMP, summary::TEMP_MEAN),
        (fire::RH, summary::RH_MEAN),
        (fire::FFMC, summary::FFMC_MEAN),
        (fire::DMC, summary::DMC_MEAN),
        (fire::DC, summary::DC_MEAN),
        (fire::ISI, summary::ISI_MEAN),
    ]
    .into_iter()
    .map(|(column, alias)| col(column).mean().alias(alias))
    .collect()
}

/// Group `frame` by `keys` and reduce each group with `aggs`.
///
/// Groups come back in first-appearance order; the critical month and
/// region tie-break depends on it.
pub fn group_stable(frame: DataFrame, keys: &[&str], aggs: Vec<Expr>) -> Result<DataFrame> {
    let keys: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
    Ok(frame.lazy().group_by_stable(keys).agg(aggs).collect()?)
}

fn series_as(df: &DataFrame, name: &str, dtype: &DataType) -> Result<Series> {
    Ok(df.column(name)?.as_materialized_series().cast(dtype)?)
}

/// Float column with nulls kept.
pub fn opt_f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let s = series_as(df, name, &DataType::Float64)?;
    Ok(s.f64()?.into_iter().collect())
}

/// Float column; a null reads as NaN.
pub fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    Ok(opt_f64_values(df, name)?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

pub fn i64_values(df: &DataFrame, name: &str) -> Result<Vec<i64>> {
    let s = series_as(df, name, &DataType::Int64)?;
    Ok(s.i64()?.into_iter().map(|v| v.unwrap_or_default()).collect())
}

pub fn count_values(df: &DataFrame, name: &str) -> Result<Vec<usize>> {
    Ok(i64_values(df, name)?
        .into_iter()
        .map(|v| v as usize)
        .collect())
}

pub fn str_values(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let s = series_as(df, name, &DataType::String)?;
    Ok(s.str()?
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect())
}

/// First value of a single-row reduction frame.
pub fn scalar(df: &DataFrame, name: &str) -> Result<Option<f64>> {
    Ok(opt_f64_values(df, name)?.first().copied().flatten())
}

/// Index of the first maximum. Later equal values never win; NaN is skipped.
pub fn first_max_by<T>(items: &[T], value: impl Fn(&T) -> f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, item) in items.iter().enumerate() {
        let v = value(item);
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dataset, record};

    #[test]
    fn groups_follow_first_appearance() {
        let frame = dataset(vec![
            record(1, 2, "dec", 1.0),
            record(1, 2, "jan", 2.0),
            record(1, 2, "dec", 3.0),
        ])
        .to_frame()
        .unwrap();
        let grouped = group_stable(frame, &[fire::MONTH], area_reductions()).unwrap();

        assert_eq!(str_values(&grouped, fire::MONTH).unwrap(), ["dec", "jan"]);
        assert_eq!(count_values(&grouped, summary::COUNT).unwrap(), [2, 1]);
        assert_eq!(f64_values(&grouped, summary::AREA_SUM).unwrap(), [4.0, 2.0]);
        assert_eq!(f64_values(&grouped, summary::AREA_MAX).unwrap(), [3.0, 2.0]);
    }

    #[test]
    fn whole_frame_reduction_reads_as_scalars() {
        let frame = dataset(vec![record(1, 2, "aug", 2.0), record(3, 4, "aug", 6.0)])
            .to_frame()
            .unwrap();
        let row = frame.lazy().select(area_reductions()).collect().unwrap();
        assert_eq!(count_values(&row, summary::COUNT).unwrap(), [2]);
        assert_eq!(scalar(&row, summary::AREA_MEAN).unwrap(), Some(4.0));
        assert!(scalar(&row, "no_such_column").is_err());
    }

    #[test]
    fn first_max_keeps_earliest_tie() {
        assert_eq!(first_max_by(&[1.0, 3.0, 3.0, 2.0], |v| *v), Some(1));
        assert_eq!(first_max_by::<f64>(&[], |v| *v), None);
    }

    #[test]
    fn first_max_skips_nan() {
        assert_eq!(first_max_by(&[f64::NAN, 50.0, 2.0], |v| *v), Some(1));
        assert_eq!(first_max_by(&[3.0, f64::NAN, 3.0], |v| *v), Some(0));
        assert_eq!(first_max_by(&[f64::NAN], |v| *v), None);
    }
}
