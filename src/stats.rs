//! Descriptive statistics and the Pearson correlation matrix.

use polars::prelude::*;

use crate::aggregation::scalar;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::schema::{describe, fire};

/// Numeric columns covered by [`describe`].
pub const DESCRIBED: [&str; 11] = [
    fire::X,
    fire::Y,
    fire::FFMC,
    fire::DMC,
    fire::DC,
    fire::ISI,
    fire::TEMP,
    fire::RH,
    fire::WIND,
    fire::RAIN,
    fire::AREA,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub column: &'static str,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: Option<f64>,
}

/// Min, max, mean and sample std for every numeric column.
pub fn describe(dataset: &Dataset) -> Result<Vec<ColumnStats>> {
    dataset.ensure_non_empty()?;
    let exprs: Vec<Expr> = DESCRIBED
        .iter()
        .flat_map(|c| {
            let v = col(*c).cast(DataType::Float64);
            [
                v.clone().min().alias(format!("{c}_{}", describe::MIN)),
                v.clone().max().alias(format!("{c}_{}", describe::MAX)),
                v.clone().mean().alias(format!("{c}_{}", describe::MEAN)),
                v.std(1).alias(format!("{c}_{}", describe::STD)),
            ]
        })
        .collect();
    let row = dataset.to_frame()?.lazy().select(exprs).collect()?;

    DESCRIBED
        .into_iter()
        .map(|column| {
            let stat = |name: &str| scalar(&row, &format!("{column}_{name}"));
            Ok(ColumnStats {
                column,
                min: stat(describe::MIN)?.unwrap_or(f64::NAN),
                max: stat(describe::MAX)?.unwrap_or(f64::NAN),
                mean: stat(describe::MEAN)?.unwrap_or(f64::NAN),
                std: stat(describe::STD)?.filter(|s| !s.is_nan()),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<&'static str>,
    /// Symmetric, `values[i][j]` correlates `columns[i]` with `columns[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| *c == a)?;
        let j = self.columns.iter().position(|c| *c == b)?;
        Some(self.values[i][j])
    }
}

/// Pearson correlation across the fire-danger indices, weather and burned
/// area. A column without variance correlates as NaN.
pub fn correlation_matrix(dataset: &Dataset) -> Result<CorrelationMatrix> {
    dataset.ensure_non_empty()?;
    let columns = fire::CORRELATED;
    let n = columns.len();
    let pair = |i: usize, j: usize| format!("{}:{}", columns[i], columns[j]);

    let mut exprs = Vec::with_capacity(n * (n + 1) / 2);
    for i in 0..n {
        for j in i..n {
            exprs.push(
                pearson_corr(
                    col(columns[i]).cast(DataType::Float64),
                    col(columns[j]).cast(DataType::Float64),
                )
                .alias(pair(i, j)),
            );
        }
    }
    let row = dataset.to_frame()?.lazy().select(exprs).collect()?;

    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = scalar(&row, &pair(i, j))?.unwrap_or(f64::NAN);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    Ok(CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    })
}

pub fn describe_frame(stats: &[ColumnStats]) -> Result<DataFrame> {
    let columns: Vec<Column> = vec![
        Series::new(
            describe::VARIABLE.into(),
            stats.iter().map(|s| s.column).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(describe::MIN.into(), stats.iter().map(|s| s.min).collect::<Vec<_>>()).into(),
        Series::new(describe::MAX.into(), stats.iter().map(|s| s.max).collect::<Vec<_>>()).into(),
        Series::new(describe::MEAN.into(), stats.iter().map(|s| s.mean).collect::<Vec<_>>()).into(),
        Series::new(describe::STD.into(), stats.iter().map(|s| s.std).collect::<Vec<_>>()).into(),
    ];
    Ok(DataFrame::new(columns)?)
}

/// Square frame with a leading `variable` label column.
pub fn correlation_frame(matrix: &CorrelationMatrix) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(matrix.columns.len() + 1);
    columns.push(Series::new(describe::VARIABLE.into(), matrix.columns.clone()).into());
    for (j, name) in matrix.columns.iter().enumerate() {
        let col: Vec<f64> = matrix.values.iter().map(|row| row[j]).collect();
        columns.push(Series::new((*name).into(), col).into());
    }
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dataset, record};

    #[test]
    fn describe_covers_numeric_columns() {
        let mut a = record(1, 2, "aug", 0.0);
        a.temp = 10.0;
        let mut b = record(5, 6, "aug", 4.0);
        b.temp = 20.0;
        let stats = describe(&dataset(vec![a, b])).unwrap();
        assert_eq!(stats.len(), DESCRIBED.len());

        let temp = stats.iter().find(|s| s.column == fire::TEMP).unwrap();
        assert_eq!((temp.min, temp.max, temp.mean), (10.0, 20.0, 15.0));
        assert!((temp.std.unwrap() - 50.0f64.sqrt()).abs() < 1e-9);
        let x = stats.iter().find(|s| s.column == fire::X).unwrap();
        assert_eq!(x.mean, 3.0);
    }

    #[test]
    fn single_record_has_no_spread() {
        let stats = describe(&dataset(vec![record(4, 4, "may", 1.5)])).unwrap();
        let area = stats.iter().find(|s| s.column == fire::AREA).unwrap();
        assert_eq!((area.min, area.max, area.mean), (1.5, 1.5, 1.5));
        assert_eq!(area.std, None);
        assert!(describe(&Dataset::default()).is_err());
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let rows = (0..5)
            .map(|i| {
                let mut r = record(1, 2, "jul", i as f64 * 2.0);
                r.temp = 15.0 + i as f64;
                r.rh = 60.0 - 3.0 * i as f64;
                r.ffmc = 80.0 + (i % 2) as f64;
                r.dmc = 10.0 * i as f64;
                r.dc = 100.0 + i as f64;
                r.isi = 1.0 + (i * i) as f64;
                r.wind = 2.0 + (i % 3) as f64;
                r
            })
            .collect();
        let m = correlation_matrix(&dataset(rows)).unwrap();
        assert_eq!(m.columns.len(), 9);
        assert!((m.get(fire::TEMP, fire::AREA).unwrap() - 1.0).abs() < 1e-9);
        assert!((m.get(fire::RH, fire::TEMP).unwrap() + 1.0).abs() < 1e-9);
        assert_eq!(m.get(fire::ISI, fire::WIND), m.get(fire::WIND, fire::ISI));
        // rain never varies
        assert!(m.get(fire::RAIN, fire::AREA).unwrap().is_nan());

        let df = correlation_frame(&m).unwrap();
        assert_eq!(df.shape(), (9, 10));
    }
}
