use std::path::PathBuf;
use std::sync::Arc;

use firedash::grid::{area_heatmap, rank_cells, RankBy};
use firedash::monthly::SeasonalHighlights;
use firedash::stats::correlation_matrix;
use firedash::{
    aggregate_by_grid, aggregate_by_month, kpis, Dataset, DatasetCache, FireError, GridCell,
    Month,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn sample() -> Dataset {
    firedash::load(fixture("forestfires_sample.csv")).expect("sample fixture should load")
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn sample_kpis() {
    let k = kpis(&sample()).unwrap();
    assert_eq!(k.total_incidents, 20);
    assert!(close(k.area_total, 65.48));
    assert!(close(k.area_mean, 65.48 / 20.0));
    assert_eq!(k.area_max, 24.77);
    assert_eq!(k.critical_month, Month::Aug);
    assert_eq!(k.critical_month_count, 6);
    assert_eq!(k.critical_region, GridCell::new(6, 3));
    assert_eq!(k.critical_region_area, 24.77);
}

#[test]
fn grid_partitions_total_area() {
    let ds = sample();
    let cells = aggregate_by_grid(&ds).unwrap();
    assert_eq!(cells.len(), 9);

    let total: f64 = cells.iter().map(|c| c.area_sum).sum();
    assert!(close(total, kpis(&ds).unwrap().area_total));
    assert_eq!(cells.iter().map(|c| c.count).sum::<usize>(), ds.len());

    // first-appearance order
    assert_eq!(cells[0].cell, GridCell::new(7, 5));
    assert_eq!(cells[1].cell, GridCell::new(7, 4));
    assert_eq!(cells[1].count, 4);
    assert_eq!(cells[1].area_max, 13.05);
}

#[test]
fn critical_region_is_top_grid_cell() {
    let ds = sample();
    let cells = aggregate_by_grid(&ds).unwrap();
    let top = &rank_cells(&cells, RankBy::AreaTotal, Some(1))[0];
    assert_eq!(kpis(&ds).unwrap().critical_region, top.cell);
}

#[test]
fn months_follow_calendar_order() {
    let ds = sample();
    let months = aggregate_by_month(&ds).unwrap();
    let order: Vec<Month> = months.iter().map(|m| m.month).collect();
    assert_eq!(
        order,
        [
            Month::Feb,
            Month::Mar,
            Month::Jul,
            Month::Aug,
            Month::Sep,
            Month::Oct,
            Month::Dec
        ]
    );
    for pair in months.windows(2) {
        assert!(pair[0].month.canonical_index() < pair[1].month.canonical_index());
    }
    assert_eq!(months.iter().map(|m| m.count).sum::<usize>(), ds.len());

    let dec = months.last().unwrap();
    assert_eq!(dec.count, 1);
    assert_eq!(dec.area_std, None);

    let aug = &months[3];
    assert_eq!(aug.count, 6);
    assert!(close(aug.area_sum, 14.86));
    assert!(close(aug.temp_mean, 122.8 / 6.0));
}

#[test]
fn seasonal_highlights_on_sample() {
    let months = aggregate_by_month(&sample()).unwrap();
    let h = SeasonalHighlights::from_summaries(&months).unwrap();
    assert_eq!(h.busiest, Month::Aug);
    assert_eq!(h.most_burned, Month::Dec);
    assert_eq!(h.hottest, Month::Aug);
}

#[test]
fn aggregations_are_idempotent() {
    let ds = sample();
    let again = firedash::load(fixture("forestfires_sample.csv")).unwrap();
    assert_eq!(ds, again);
    assert_eq!(aggregate_by_grid(&ds).unwrap(), aggregate_by_grid(&ds).unwrap());
    assert_eq!(aggregate_by_month(&ds).unwrap(), aggregate_by_month(&ds).unwrap());
    assert_eq!(kpis(&ds).unwrap(), kpis(&again).unwrap());
}

#[test]
fn heatmap_matches_grid_totals() {
    let ds = sample();
    let map = area_heatmap(&ds).unwrap();
    assert_eq!(map.xs, [1, 2, 4, 6, 7, 8]);
    assert_eq!(map.ys, [2, 3, 4, 5, 6]);
    let total: f64 = map.values.iter().flatten().sum();
    assert!(close(total, 65.48));
    assert_eq!(map.value_at(GridCell::new(6, 3)), Some(24.77));
}

#[test]
fn correlation_diagonal_is_one() {
    let m = correlation_matrix(&sample()).unwrap();
    for (i, row) in m.values.iter().enumerate() {
        assert!(close(row[i], 1.0), "diagonal for {}", m.columns[i]);
    }
}

#[test]
fn missing_column_fails_to_load() {
    let err = firedash::load(fixture("missing_area.csv")).unwrap_err();
    assert!(matches!(err, FireError::MissingColumn(ref c) if c == "area"));
    assert!(err.is_load_error());
}

#[test]
fn nan_area_fails_to_load() {
    let err = firedash::load(fixture("nan_area.csv")).unwrap_err();
    assert!(matches!(
        err,
        FireError::InvalidValue { ref column, row: 1, ref value } if column == "area" && value == "NaN"
    ));
    assert!(err.is_load_error());
}

#[test]
fn missing_file_fails_to_load() {
    let err = firedash::load(fixture("no_such_file.csv")).unwrap_err();
    assert!(matches!(err, FireError::FileNotFound(_)));
}

#[test]
fn unknown_month_is_rejected_everywhere() {
    let ds = firedash::load(fixture("unknown_month.csv")).unwrap();
    assert_eq!(ds.len(), 2);
    assert!(matches!(kpis(&ds), Err(FireError::UnknownMonth(ref m)) if m == "Octo"));
    assert!(matches!(aggregate_by_grid(&ds), Err(FireError::UnknownMonth(_))));
    assert!(matches!(aggregate_by_month(&ds), Err(FireError::UnknownMonth(_))));
}

#[test]
fn header_only_file_is_an_empty_dataset() {
    let ds = firedash::load(fixture("header_only.csv")).unwrap();
    assert!(ds.is_empty());
    assert!(matches!(kpis(&ds), Err(FireError::EmptyDataset)));
    assert!(matches!(aggregate_by_grid(&ds), Err(FireError::EmptyDataset)));
    assert!(aggregate_by_month(&ds).unwrap().is_empty());
}

#[test]
fn cache_loads_each_path_once() {
    let cache = DatasetCache::new();
    let a = cache.get_or_load(fixture("forestfires_sample.csv")).unwrap();
    let b = cache.get_or_load(fixture("forestfires_sample.csv")).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.len(), 1);

    assert!(cache.get_or_load(fixture("missing_area.csv")).is_err());
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
}
