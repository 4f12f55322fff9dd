//! End-to-end runs of the load, reshape and trend pipeline over CSV files.

use europower::data::{DataLoader, DataProcessor, Fuel, LoaderError, REQUIRED_COLUMNS};
use europower::stats::StatsCalculator;
use std::fs;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

const HEADER: &str =
    "Area,Country code,Year,Area type,Continent,Category,Subcategory,Variable,Unit,Value,YoY absolute change,YoY % change";

fn write_release(rows: &[&str]) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("europe_yearly_full_release_long_format.csv");
    let mut body = String::from(HEADER);
    for row in rows {
        body.push('\n');
        body.push_str(row);
    }
    body.push('\n');
    fs::write(&path, body).unwrap();
    (dir, path)
}

fn selection(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn trend_scenario_omits_country_with_single_point() {
    let (_dir, path) = write_release(&[
        "Germany,DEU,2015,Country,Europe,Power sector emissions,CO2 intensity,CO2 intensity,gCO2/kWh,400,,",
        "Germany,DEU,2016,Country,Europe,Power sector emissions,CO2 intensity,CO2 intensity,gCO2/kWh,380,-20,-5",
        "Germany,DEU,2017,Country,Europe,Power sector emissions,CO2 intensity,CO2 intensity,gCO2/kWh,360,-20,-5.26",
        "Spain,ESP,2017,Country,Europe,Power sector emissions,CO2 intensity,CO2 intensity,gCO2/kWh,250,,",
        "EU,,2017,Region,Europe,Power sector emissions,CO2 intensity,CO2 intensity,gCO2/kWh,275,,",
    ]);

    let dataset = DataLoader::load_csv(&path).unwrap();
    let trends =
        StatsCalculator::estimate_trends(&dataset, &selection(&["Germany", "Spain"])).unwrap();

    assert_eq!(trends.countries(), ["Germany"]);
    assert!((trends.slope("Germany").unwrap() + 20.0).abs() < 1e-9);
    assert!(trends.slope("Spain").is_none());
}

#[test]
fn mix_scenario_leaves_missing_fuels_undefined() {
    let (_dir, path) = write_release(&[
        "Germany,DEU,2020,Country,Europe,Electricity generation,Fuel,Hard coal,%,30,,",
        "Germany,DEU,2020,Country,Europe,Electricity generation,Fuel,Gas,%,20,,",
        "Germany,DEU,2020,Country,Europe,Electricity generation,Fuel,Solar,%,50,,",
        "Germany,DEU,2020,Country,Europe,Electricity generation,Fuel,Solar,TWh,48.5,,",
        "Spain,ESP,2020,Country,Europe,Electricity generation,Fuel,Solar,%,12,,",
    ]);

    let dataset = DataLoader::load_csv(&path).unwrap();
    let rows = DataProcessor::reshape_mix(&dataset, &selection(&["Germany"])).unwrap();

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!((row.area.as_str(), row.year), ("Germany", 2020));
    assert_eq!(row.share(Fuel::HardCoal), Some(30.0));
    assert_eq!(row.share(Fuel::Gas), Some(20.0));
    assert_eq!(row.share(Fuel::Solar), Some(50.0));
    for fuel in Fuel::ALL {
        if !matches!(fuel, Fuel::HardCoal | Fuel::Gas | Fuel::Solar) {
            assert_eq!(row.share(fuel), None, "{} should be undefined", fuel.label());
        }
    }
    assert!((row.fuel_total() - 100.0).abs() < 1e-9);
}

#[test]
fn cleaned_dataset_has_seven_columns_and_no_eu_rows() {
    let (_dir, path) = write_release(&[
        "EU,,2020,Region,Europe,Electricity generation,Fuel,Gas,%,19,,",
        "Croatia,HRV,2020,Country,Europe,Electricity generation,Fuel,Gas,%,13,,",
    ]);

    let dataset = DataLoader::load_csv(&path).unwrap();
    assert_eq!(dataset.column_names(), REQUIRED_COLUMNS);
    assert_eq!(dataset.areas(), ["Croatia"]);
    assert!(dataset
        .observations()
        .unwrap()
        .iter()
        .all(|row| row.area != "EU"));
}

#[test]
fn missing_required_column_fails_to_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("release.csv");
    fs::write(
        &path,
        "Area,Year,Category,Subcategory,Variable,Value\nGermany,2020,Electricity generation,Fuel,Gas,15\n",
    )
    .unwrap();

    match DataLoader::load_csv(&path) {
        Err(LoaderError::Schema { column }) => assert_eq!(column, "Unit"),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn empty_selections_produce_empty_results() {
    let (_dir, path) = write_release(&[
        "Denmark,DNK,2019,Country,Europe,Power sector emissions,CO2 intensity,CO2 intensity,gCO2/kWh,160,,",
        "Denmark,DNK,2020,Country,Europe,Power sector emissions,CO2 intensity,CO2 intensity,gCO2/kWh,125,,",
        "Denmark,DNK,2020,Country,Europe,Electricity generation,Fuel,Onshore wind,%,40,,",
    ]);

    let dataset = DataLoader::load_csv(&path).unwrap();
    assert!(DataProcessor::reshape_mix(&dataset, &[]).unwrap().is_empty());
    assert!(StatsCalculator::estimate_trends(&dataset, &[])
        .unwrap()
        .is_empty());
}

#[test]
fn decimal_values_after_many_whole_numbers_are_kept() {
    let mut rows: Vec<String> = (0..10_001)
        .map(|i| {
            format!(
                "Austria,AUT,{},Country,Europe,Electricity generation,Fuel,Hydro,TWh,{},,",
                1990 + i % 35,
                i % 50
            )
        })
        .collect();
    rows.push(
        "Germany,DEU,2015,Country,Europe,Power sector emissions,CO2 intensity,CO2 intensity,gCO2/kWh,400.5,,"
            .to_string(),
    );
    rows.push(
        "Germany,DEU,2016,Country,Europe,Power sector emissions,CO2 intensity,CO2 intensity,gCO2/kWh,380.5,-20,-4.99"
            .to_string(),
    );
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let (_dir, path) = write_release(&rows);

    let dataset = DataLoader::load_csv(&path).unwrap();
    assert_eq!(dataset.height(), 10_003);

    let trends = StatsCalculator::estimate_trends(&dataset, &selection(&["Germany"])).unwrap();
    assert!((trends.slope("Germany").unwrap() + 20.0).abs() < 1e-9);
    assert!(trends.skipped.is_empty());
}
