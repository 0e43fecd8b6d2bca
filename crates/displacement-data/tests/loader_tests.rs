//! Integration tests for loading monitoring files

use chrono::NaiveDate;
use displacement_core::Error;
use displacement_data::{LoaderOptions, SeriesLoader};
use std::io::Write;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const SAMPLE: &str = "\
date;A1_TOT;A1_HOR;A1_VER
31/01/2023;1.0;0.5;9.9
28/02/2023;1.5;;9.9
31/03/2023;2.0;0.7;9.9
30/04/2023;NaN;0.8;9.9
";

#[test]
fn test_verification_columns_excluded() {
    let loader = SeriesLoader::default();
    let dataset = loader.load_reader("dd_test", SAMPLE.as_bytes()).unwrap();

    assert_eq!(dataset.name, "dd_test");
    assert_eq!(dataset.series_ids(), vec!["A1_TOT", "A1_HOR"]);
    assert!(dataset.get("A1_VER").is_none());
}

#[test]
fn test_missing_values_dropped_per_column() {
    let loader = SeriesLoader::default();
    let dataset = loader.load_reader("dd_test", SAMPLE.as_bytes()).unwrap();

    let tot = dataset.get("A1_TOT").unwrap();
    assert_eq!(tot.len(), 3);
    assert_eq!(tot.values(), vec![1.0, 1.5, 2.0]);
    assert_eq!(tot.last_timestamp(), Some(date(2023, 3, 31)));

    let hor = dataset.get("A1_HOR").unwrap();
    assert_eq!(hor.len(), 3);
    assert_eq!(
        hor.timestamps(),
        vec![date(2023, 1, 31), date(2023, 3, 31), date(2023, 4, 30)]
    );
}

#[test]
fn test_unparsable_date_is_data_error() {
    let content = "date;A\n31/01/2023;1.0\nnot-a-date;2.0\n";
    let result = SeriesLoader::default().load_reader("bad", content.as_bytes());
    match result {
        Err(Error::Data(msg)) => assert!(msg.contains("line 3"), "message: {msg}"),
        other => panic!("expected data error, got {other:?}"),
    }
}

#[test]
fn test_non_numeric_value_is_data_error() {
    let content = "date;A\n31/01/2023;abc\n";
    let result = SeriesLoader::default().load_reader("bad", content.as_bytes());
    assert!(matches!(result, Err(Error::Data(_))));
}

#[test]
fn test_missing_date_column_is_data_error() {
    let content = "fecha;A\n31/01/2023;1.0\n";
    let result = SeriesLoader::default().load_reader("bad", content.as_bytes());
    assert!(matches!(result, Err(Error::Data(_))));
}

#[test]
fn test_ragged_row_is_data_error() {
    let content = "date;A;B\n31/01/2023;1.0;2.0\n28/02/2023;1.0\n";
    let result = SeriesLoader::default().load_reader("bad", content.as_bytes());
    assert!(matches!(result, Err(Error::Data(_))));
}

#[test]
fn test_decimal_comma_and_custom_separator() {
    let options = LoaderOptions {
        separator: '\t',
        decimal: ',',
        ..LoaderOptions::default()
    };
    let content = "date\tP_TOT\n01/01/2023 08:30\t1,25\n01/02/2023 09:00:00\t-0,5\n";
    let dataset = SeriesLoader::new(options)
        .load_reader("tabs", content.as_bytes())
        .unwrap();

    let series = dataset.get("P_TOT").unwrap();
    assert_eq!(series.values(), vec![1.25, -0.5]);
    assert_eq!(series.first_timestamp(), Some(date(2023, 1, 1)));
}

#[test]
fn test_load_path_names_dataset_after_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dd_abra.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();
    drop(file);

    let dataset = SeriesLoader::default().load_path(&path).unwrap();
    assert_eq!(dataset.name, "dd_abra");
    assert_eq!(dataset.series.len(), 2);
}

#[test]
fn test_load_path_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = SeriesLoader::default().load_path(&dir.path().join("missing.csv"));
    assert!(matches!(result, Err(Error::Data(_))));
}

#[test]
fn test_unsorted_rows_are_ordered() {
    let content = "date;A\n28/02/2023;2.0\n31/01/2023;1.0\n";
    let dataset = SeriesLoader::default().load_reader("x", content.as_bytes()).unwrap();
    let series = dataset.get("A").unwrap();
    assert_eq!(series.values(), vec![1.0, 2.0]);
}

#[test]
fn test_intraday_readings_collapse_to_latest_of_day() {
    let content = "\
date;A_TOT;B_TOT
01/01/2023 08:00;1.0;2.0
01/01/2023 16:00;1.1;2.1
02/01/2023 08:00;1.2;
";
    let dataset = SeriesLoader::default()
        .load_reader("dd_intraday", content.as_bytes())
        .unwrap();

    let a = dataset.get("A_TOT").unwrap();
    assert_eq!(a.timestamps(), vec![date(2023, 1, 1), date(2023, 1, 2)]);
    assert_eq!(a.values(), vec![1.1, 1.2]);

    let b = dataset.get("B_TOT").unwrap();
    assert_eq!(b.timestamps(), vec![date(2023, 1, 1)]);
    assert_eq!(b.values(), vec![2.1]);
}

#[test]
fn test_dash_is_not_a_missing_token() {
    let content = "date;A\n31/01/2023;-\n";
    let result = SeriesLoader::default().load_reader("dash", content.as_bytes());
    assert!(matches!(result, Err(Error::Data(_))));
}
