//! Dataset loader: reads the fire-incident CSV into typed records.
//!
//! The file is read with every column as a string, header names are
//! trimmed and lower-cased, the required columns are checked once, and
//! numeric columns are parsed up front so that aggregations never touch
//! untyped cells.

use std::path::Path;

use polars::prelude::*;
use tracing::{debug, info};

use crate::aggregation::{f64_values, i64_values, str_values};
use crate::error::{FireError, Result};
use crate::grid::GridCell;
use crate::reference::Month;
use crate::schema::fire;

/// One row of the Montesinho dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct FireRecord {
    pub x: i64,
    pub y: i64,
    /// Raw month code; validated by the aggregations, not by the loader.
    pub month: String,
    pub day: String,
    pub ffmc: f64,
    pub dmc: f64,
    pub dc: f64,
    pub isi: f64,
    pub temp: f64,
    pub rh: f64,
    pub wind: f64,
    pub rain: f64,
    /// Burned area in hectares.
    pub area: f64,
}

impl FireRecord {
    pub fn cell(&self) -> GridCell {
        GridCell::new(self.x, self.y)
    }

    pub fn month(&self) -> Result<Month> {
        Month::parse_record(&self.month)
    }
}

/// Immutable, ordered collection of fire records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<FireRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<FireRecord>) -> Self {
        Self { records }
    }

    /// Load a delimited fire-incident file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(FireError::FileNotFound(path.to_path_buf()));
        }

        let raw = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0)) // all columns as String
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        let dataset = Self::from_frame(raw)?;
        info!(
            path = %path.display(),
            records = dataset.len(),
            "loaded fire dataset"
        );
        Ok(dataset)
    }

    /// Build a dataset from an already-read frame.
    ///
    /// Column names are normalized first; numeric columns may be either
    /// strings or numbers.
    pub fn from_frame(mut df: DataFrame) -> Result<Self> {
        normalize_column_names(&mut df)?;
        require_columns(&df, &fire::REQUIRED)?;

        let mut casts: Vec<Expr> = Vec::with_capacity(fire::INTEGER.len() + fire::FLOAT.len());
        for name in fire::INTEGER {
            casts.push(numeric_expr(&df, name, DataType::Int64)?);
        }
        for name in fire::FLOAT {
            casts.push(numeric_expr(&df, name, DataType::Float64)?);
        }
        let typed = df
            .clone()
            .lazy()
            .select(
                [col(fire::MONTH), col(fire::DAY)]
                    .into_iter()
                    .chain(casts)
                    .collect::<Vec<_>>(),
            )
            .collect()?;

        for name in fire::INTEGER.iter().chain(fire::FLOAT.iter()) {
            check_parsed(&df, &typed, name)?;
        }

        let xs = i64_values(&typed, fire::X)?;
        let ys = i64_values(&typed, fire::Y)?;
        let months = str_values(&typed, fire::MONTH)?;
        let days = str_values(&typed, fire::DAY)?;
        let ffmc = f64_values(&typed, fire::FFMC)?;
        let dmc = f64_values(&typed, fire::DMC)?;
        let dc = f64_values(&typed, fire::DC)?;
        let isi = f64_values(&typed, fire::ISI)?;
        let temp = f64_values(&typed, fire::TEMP)?;
        let rh = f64_values(&typed, fire::RH)?;
        let wind = f64_values(&typed, fire::WIND)?;
        let rain = f64_values(&typed, fire::RAIN)?;
        let area = f64_values(&typed, fire::AREA)?;

        let records = months
            .into_iter()
            .zip(days)
            .enumerate()
            .map(|(i, (month, day))| FireRecord {
                x: xs[i],
                y: ys[i],
                month,
                day,
                ffmc: ffmc[i],
                dmc: dmc[i],
                dc: dc[i],
                isi: isi[i],
                temp: temp[i],
                rh: rh[i],
                wind: wind[i],
                rain: rain[i],
                area: area[i],
            })
            .collect::<Vec<_>>();

        debug!(rows = records.len(), "parsed fire records");
        Ok(Self { records })
    }

    pub fn records(&self) -> &[FireRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fails with [`FireError::EmptyDataset`] when there are no records.
    pub fn ensure_non_empty(&self) -> Result<()> {
        if self.records.is_empty() {
            return Err(FireError::EmptyDataset);
        }
        Ok(())
    }

    /// Subset restricted to the given months, dataset order kept.
    pub fn filter_months(&self, months: &[Month]) -> Self {
        let records = self
            .records
            .iter()
            .filter(|r| r.month().is_ok_and(|m| months.contains(&m)))
            .cloned()
            .collect();
        Self { records }
    }

    /// Typed frame of the records, columns in [`fire::REQUIRED`] order.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let recs = &self.records;
        let ints = |f: fn(&FireRecord) -> i64| recs.iter().map(f).collect::<Vec<_>>();
        let floats = |f: fn(&FireRecord) -> f64| recs.iter().map(f).collect::<Vec<_>>();
        let months: Vec<&str> = recs.iter().map(|r| r.month.as_str()).collect();
        let days: Vec<&str> = recs.iter().map(|r| r.day.as_str()).collect();

        let columns: Vec<Column> = vec![
            Series::new(fire::X.into(), ints(|r| r.x)).into(),
            Series::new(fire::Y.into(), ints(|r| r.y)).into(),
            Series::new(fire::MONTH.into(), months).into(),
            Series::new(fire::DAY.into(), days).into(),
            Series::new(fire::FFMC.into(), floats(|r| r.ffmc)).into(),
            Series::new(fire::DMC.into(), floats(|r| r.dmc)).into(),
            Series::new(fire::DC.into(), floats(|r| r.dc)).into(),
            Series::new(fire::ISI.into(), floats(|r| r.isi)).into(),
            Series::new(fire::TEMP.into(), floats(|r| r.temp)).into(),
            Series::new(fire::RH.into(), floats(|r| r.rh)).into(),
            Series::new(fire::WIND.into(), floats(|r| r.wind)).into(),
            Series::new(fire::RAIN.into(), floats(|r| r.rain)).into(),
            Series::new(fire::AREA.into(), floats(|r| r.area)).into(),
        ];
        Ok(DataFrame::new(columns)?)
    }
}

/// Lower-case and trim every header name.
fn normalize_column_names(df: &mut DataFrame) -> Result<()> {
    let normalized: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_lowercase())
        .collect();
    df.set_column_names(normalized.as_slice())?;
    Ok(())
}

fn require_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(FireError::MissingColumn(col_name.to_string()));
        }
    }
    Ok(())
}

/// Parse expression for a numeric column; string input is stripped first.
fn numeric_expr(df: &DataFrame, name: &str, dtype: DataType) -> Result<Expr> {
    let expr = match df.column(name)?.dtype() {
        DataType::String => col(name).str().strip_chars(lit(" \t\r\n")).cast(dtype),
        _ => col(name).cast(dtype),
    };
    Ok(expr)
}

/// First row whose parsed value is unusable: empty or unparseable cells,
/// non-finite floats, and negative burned area.
fn check_parsed(raw: &DataFrame, typed: &DataFrame, name: &str) -> Result<()> {
    let parsed = typed.column(name)?.as_materialized_series();
    let bad_row = match parsed.dtype() {
        DataType::Float64 => parsed.f64()?.into_iter().position(|v| match v {
            Some(v) => !v.is_finite() || (name == fire::AREA && v < 0.0),
            None => true,
        }),
        _ => {
            let mask = parsed.is_null();
            let pos = mask.into_iter().position(|is_null| is_null == Some(true));
            pos
        }
    };
    let Some(row) = bad_row else {
        return Ok(());
    };
    let value = raw
        .column(name)?
        .get(row)
        .map(|v| match v {
            AnyValue::Null => String::new(),
            AnyValue::String(s) => s.to_string(),
            AnyValue::StringOwned(s) => s.to_string(),
            other => other.to_string(),
        })
        .unwrap_or_default();
    Err(FireError::InvalidValue {
        column: name.to_string(),
        row: row + 1,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_frame(header: [&str; 13], rows: &[[&str; 13]]) -> DataFrame {
        let columns: Vec<Column> = header
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let values: Vec<&str> = rows.iter().map(|r| r[i]).collect();
                Series::new((*name).into(), values).into()
            })
            .collect();
        DataFrame::new(columns).unwrap()
    }

    const HEADER: [&str; 13] = [
        " X", "Y ", "Month", "DAY", "FFMC", "DMC", "DC", "ISI", "temp", "RH", "wind", "rain",
        "AREA",
    ];

    #[test]
    fn normalizes_headers_and_parses_values() {
        let df = raw_frame(
            HEADER,
            &[[
                "7", "5", "mar", "fri", "86.2", "26.2", "94.3", "5.1", "8.2", "51", "6.7", "0",
                " 0.36 ",
            ]],
        );
        let ds = Dataset::from_frame(df).unwrap();
        assert_eq!(ds.len(), 1);
        let r = &ds.records()[0];
        assert_eq!((r.x, r.y), (7, 5));
        assert_eq!(r.month, "mar");
        assert_eq!(r.day, "fri");
        assert_eq!(r.rh, 51.0);
        assert_eq!(r.area, 0.36);
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let mut header = HEADER;
        header[12] = "burned";
        let df = raw_frame(header, &[]);
        let err = Dataset::from_frame(df).unwrap_err();
        assert!(matches!(err, FireError::MissingColumn(ref c) if c == "area"));
        assert!(err.is_load_error());
    }

    #[test]
    fn unparseable_number_is_a_load_error() {
        let df = raw_frame(
            HEADER,
            &[
                ["1", "2", "jan", "mon", "1", "1", "1", "1", "1", "1", "1", "0", "0"],
                ["1", "2", "jan", "mon", "1", "1", "1", "1", "warm", "1", "1", "0", "0"],
            ],
        );
        match Dataset::from_frame(df) {
            Err(FireError::InvalidValue { column, row, value }) => {
                assert_eq!(column, "temp");
                assert_eq!(row, 2);
                assert_eq!(value, "warm");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    fn rejected(rows: &[[&str; 13]]) -> (String, usize, String) {
        match Dataset::from_frame(raw_frame(HEADER, rows)) {
            Err(FireError::InvalidValue { column, row, value }) => (column, row, value),
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn nan_area_is_rejected() {
        let (column, row, value) = rejected(&[
            ["1", "2", "mar", "fri", "90", "35", "600", "8", "18", "45", "4", "0", "NaN"],
            ["3", "4", "mar", "fri", "90", "35", "600", "8", "18", "45", "4", "0", "50.0"],
        ]);
        assert_eq!((column.as_str(), row, value.as_str()), ("area", 1, "NaN"));
    }

    #[test]
    fn negative_area_is_rejected() {
        let (column, row, _) = rejected(&[
            ["3", "4", "mar", "fri", "90", "35", "600", "8", "18", "45", "4", "0", "1.0"],
            ["3", "4", "mar", "fri", "90", "35", "600", "8", "18", "45", "4", "0", "-0.5"],
        ]);
        assert_eq!((column.as_str(), row), ("area", 2));
    }

    #[test]
    fn infinite_weather_value_is_rejected() {
        let (column, row, value) = rejected(&[[
            "3", "4", "mar", "fri", "90", "35", "600", "8", "inf", "45", "4", "0", "1.0",
        ]]);
        assert_eq!((column.as_str(), row, value.as_str()), ("temp", 1, "inf"));
    }

    #[test]
    fn month_codes_are_carried_verbatim() {
        let df = raw_frame(
            HEADER,
            &[["1", "2", "Foo", "mon", "1", "1", "1", "1", "1", "1", "1", "0", "0"]],
        );
        let ds = Dataset::from_frame(df).unwrap();
        assert_eq!(ds.records()[0].month, "Foo");
        assert!(ds.records()[0].month().is_err());
    }

    #[test]
    fn frame_round_trip_preserves_records() {
        let df = raw_frame(
            HEADER,
            &[
                ["3", "4", "aug", "sun", "92.1", "111.2", "654.1", "9.6", "20.4", "42", "4.0", "0", "1.5"],
                ["9", "9", "sep", "sat", "91.0", "129.5", "692.6", "7.0", "17.6", "46", "3.1", "0", "0"],
            ],
        );
        let ds = Dataset::from_frame(df).unwrap();
        let again = Dataset::from_frame(ds.to_frame().unwrap()).unwrap();
        assert_eq!(ds, again);
    }

    #[test]
    fn filter_months_keeps_order() {
        let df = raw_frame(
            HEADER,
            &[
                ["1", "2", "aug", "mon", "1", "1", "1", "1", "1", "1", "1", "0", "1"],
                ["1", "2", "jan", "mon", "1", "1", "1", "1", "1", "1", "1", "0", "2"],
                ["1", "2", "aug", "mon", "1", "1", "1", "1", "1", "1", "1", "0", "3"],
            ],
        );
        let ds = Dataset::from_frame(df).unwrap();
        let aug = ds.filter_months(&[Month::Aug]);
        let areas: Vec<f64> = aug.records().iter().map(|r| r.area).collect();
        assert_eq!(areas, [1.0, 3.0]);
    }
}
