use expense_pivot::aggregator::pivot::{compute_pivot, ColumnLabel, PivotTable, RowLabel};
use expense_pivot::records::{Dimension, PurchaseRecord};
use expense_pivot::utils::error::PivotError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use std::str::FromStr;

fn d(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn record(amount: &str, category: &str, stage: &str) -> PurchaseRecord {
    PurchaseRecord::new(d(amount), category, stage)
}

fn stage_sum(table: &PivotTable, row: &RowLabel) -> Decimal {
    table
        .stages
        .iter()
        .map(|s| table.cell(row, &ColumnLabel::Stage(s.clone())).unwrap())
        .sum()
}

#[test]
fn test_scenario_single_cell() {
    let table = compute_pivot(
        &[record("100", "Material", "Basement")],
        &names(&["Material"]),
        &names(&["Basement"]),
    )
    .unwrap();

    let material = RowLabel::Category("Material".to_string());
    let basement = ColumnLabel::Stage("Basement".to_string());

    assert_eq!(table.cell(&material, &basement), Some(d("100")));
    assert_eq!(table.cell(&material, &ColumnLabel::Total), Some(d("100")));
    assert_eq!(table.cell(&RowLabel::GrandTotal, &basement), Some(d("100")));
    assert_eq!(table.cell(&RowLabel::GrandTotal, &ColumnLabel::Total), Some(d("100")));
    assert_eq!(table.cell(&RowLabel::Percentage, &basement), Some(d("100")));
    assert_eq!(table.cell(&RowLabel::Percentage, &ColumnLabel::Total), Some(d("100")));
}

#[test]
fn test_scenario_no_records() {
    let categories = names(&["Material"]);
    let stages = names(&["Basement"]);
    let table = compute_pivot(&[], &categories, &stages).unwrap();

    assert_eq!(table.grand_total, Decimal::ZERO);
    for row in table.row_labels() {
        for column in table.column_labels() {
            if let Some(value) = table.cell(&row, &column) {
                assert_eq!(value, Decimal::ZERO, "{} / {}", row, column);
            }
        }
    }
}

#[test]
fn test_scenario_two_by_two() {
    let records = vec![record("10", "A", "X"), record("30", "B", "Y")];
    let table = compute_pivot(&records, &names(&["A", "B"]), &names(&["X", "Y"])).unwrap();

    let a = RowLabel::Category("A".to_string());
    let b = RowLabel::Category("B".to_string());

    assert_eq!(table.amount("A", "Y"), Some(Decimal::ZERO));
    assert_eq!(table.amount("B", "X"), Some(Decimal::ZERO));
    assert_eq!(table.cell(&a, &ColumnLabel::Total), Some(d("10")));
    assert_eq!(table.cell(&b, &ColumnLabel::Total), Some(d("30")));
    assert_eq!(table.grand_total, d("40"));
    assert_eq!(table.cell(&a, &ColumnLabel::Percentage), Some(d("25.00")));
    assert_eq!(table.cell(&b, &ColumnLabel::Percentage), Some(d("75.00")));
    assert_eq!(
        table.cell(&RowLabel::Percentage, &ColumnLabel::Stage("X".to_string())),
        Some(d("25"))
    );
}

#[test]
fn test_every_declared_pair_present() {
    let categories = names(&["General", "Material", "Joinery"]);
    let stages = names(&["Basement", "Roof", "Masonry", "Finishes"]);
    let table = compute_pivot(&[record("5", "Joinery", "Roof")], &categories, &stages).unwrap();

    for category in &categories {
        for stage in &stages {
            assert!(table.amount(category, stage).is_some(), "{} / {}", category, stage);
        }
    }
    assert_eq!(table.category_rows().count(), categories.len());
    assert_eq!(table.rows.len(), categories.len() + 2);
}

#[test]
fn test_grand_total_invariant() {
    let records = vec![
        record("1200.50", "Material", "Basement"),
        record("300.25", "Material", "Roof"),
        record("99.99", "Mason Labour", "Basement"),
        record("-50", "Material", "Basement"),
        record("0.01", "Mason Labour", "Masonry"),
    ];
    let table = compute_pivot(
        &records,
        &names(&["Material", "Mason Labour", "Paint Labour"]),
        &names(&["Basement", "Roof", "Masonry"]),
    )
    .unwrap();

    let raw_sum: Decimal = records.iter().map(|r| r.amount).sum();
    let row_total_sum: Decimal = table.category_rows().map(|r| r.total).sum();
    let cell_sum: Decimal = table.category_rows().flat_map(|r| r.values.iter()).sum();
    let grand_total_row = table.grand_total_row().unwrap();
    let column_total_sum: Decimal = grand_total_row.values.iter().sum();

    assert_eq!(table.grand_total, raw_sum);
    assert_eq!(row_total_sum, raw_sum);
    assert_eq!(cell_sum, raw_sum);
    assert_eq!(column_total_sum, raw_sum);
    assert_eq!(grand_total_row.total, raw_sum);
    assert_eq!(stage_sum(&table, &RowLabel::GrandTotal), raw_sum);
}

#[test]
fn test_percentages_sum_to_hundred() {
    let records = vec![
        record("1", "A", "X"),
        record("1", "A", "Y"),
        record("1", "B", "Z"),
    ];
    let table = compute_pivot(&records, &names(&["A", "B"]), &names(&["X", "Y", "Z"])).unwrap();

    let tolerance = d("0.01") * Decimal::from(table.stages.len());
    let row_pct = stage_sum(&table, &RowLabel::Percentage);
    assert!((row_pct - Decimal::ONE_HUNDRED).abs() <= tolerance, "{}", row_pct);

    let column_pct: Decimal = table.category_rows().filter_map(|r| r.percentage).sum();
    assert!((column_pct - Decimal::ONE_HUNDRED).abs() <= d("0.02"), "{}", column_pct);

    // 1/3 of the total is 33.33 once rounded
    assert_eq!(table.amount("A", "X"), Some(d("1")));
    assert_eq!(
        table.cell(&RowLabel::Percentage, &ColumnLabel::Stage("X".to_string())),
        Some(d("33.33"))
    );
}

#[test]
fn test_non_positive_grand_total_zero_percentages() {
    let records = vec![record("100", "A", "X"), record("-150", "A", "Y")];
    let table = compute_pivot(&records, &names(&["A"]), &names(&["X", "Y"])).unwrap();

    assert_eq!(table.grand_total, d("-50"));
    let percentage_row = table.percentage_row().unwrap();
    assert!(percentage_row.values.iter().all(|v| v.is_zero()));
    assert!(percentage_row.total.is_zero());
    assert_eq!(
        table.cell(&RowLabel::Category("A".to_string()), &ColumnLabel::Percentage),
        Some(Decimal::ZERO)
    );
}

#[test]
fn test_unknown_dimensions_excluded() {
    let declared = vec![record("40", "A", "X")];
    let mut with_unknown = declared.clone();
    with_unknown.push(record("1000", "Unknown", "X"));
    with_unknown.push(record("1000", "A", "Unknown"));
    // Matching is exact and case-sensitive
    with_unknown.push(record("1000", "a", "X"));
    with_unknown.push(record("1000", " A", "X"));

    let categories = names(&["A"]);
    let stages = names(&["X"]);

    assert_eq!(
        compute_pivot(&with_unknown, &categories, &stages).unwrap(),
        compute_pivot(&declared, &categories, &stages).unwrap()
    );
}

#[test]
fn test_idempotent() {
    let records = vec![record("12.34", "A", "X"), record("56.78", "B", "Y")];
    let categories = names(&["A", "B"]);
    let stages = names(&["X", "Y"]);

    let first = compute_pivot(&records, &categories, &stages).unwrap();
    let second = compute_pivot(&records, &categories, &stages).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_supplied_order_and_duplicates() {
    let table = compute_pivot(
        &[record("7", "Joinery", "Roof")],
        &names(&["Joinery", "General", "Joinery"]),
        &names(&["Roof", "Basement", "Roof"]),
    )
    .unwrap();

    assert_eq!(
        table.row_labels(),
        vec![
            RowLabel::Category("Joinery".to_string()),
            RowLabel::Category("General".to_string()),
            RowLabel::GrandTotal,
            RowLabel::Percentage,
        ]
    );
    assert_eq!(table.stages, names(&["Roof", "Basement"]));
    // Duplicate declaration does not double count
    assert_eq!(table.grand_total, d("7"));
}

#[test]
fn test_decimal_sums_do_not_drift() {
    let records: Vec<PurchaseRecord> = (0..10).map(|_| record("0.1", "A", "X")).collect();
    let table = compute_pivot(&records, &names(&["A"]), &names(&["X"])).unwrap();

    assert_eq!(table.grand_total, d("1.0"));
}

#[test]
fn test_no_dimensions_error() {
    assert_eq!(
        compute_pivot(&[record("1", "A", "X")], &[], &names(&["X"])),
        Err(PivotError::NoDimensions(Dimension::Category))
    );
    assert_eq!(
        compute_pivot(&[record("1", "A", "X")], &names(&["A"]), &[]),
        Err(PivotError::NoDimensions(Dimension::Stage))
    );
}

#[test]
fn test_amount_near_decimal_max() {
    let huge = "1000000000000000000000000000";
    let table = compute_pivot(&[record(huge, "A", "X")], &names(&["A"]), &names(&["X"])).unwrap();

    assert_eq!(table.grand_total, d(huge));
    assert_eq!(
        table.cell(&RowLabel::Category("A".to_string()), &ColumnLabel::Percentage),
        Some(Decimal::ONE_HUNDRED)
    );

    let table = compute_pivot(
        &[PurchaseRecord::new(Decimal::MAX, "A", "X")],
        &names(&["A"]),
        &names(&["X"]),
    )
    .unwrap();
    assert_eq!(table.grand_total, Decimal::MAX);
}

#[test]
fn test_overflowing_sums_are_errors() {
    let categories = names(&["A", "B"]);
    let stages = names(&["X", "Y"]);

    // Same cell
    let same_cell = vec![
        PurchaseRecord::new(Decimal::MAX, "A", "X"),
        PurchaseRecord::new(Decimal::MAX, "A", "X"),
    ];
    assert!(matches!(
        compute_pivot(&same_cell, &categories, &stages),
        Err(PivotError::Overflow(_))
    ));

    // Separate cells, overflowing only in the grand total
    let spread = vec![
        PurchaseRecord::new(Decimal::MAX, "A", "X"),
        PurchaseRecord::new(Decimal::MAX, "B", "Y"),
    ];
    assert!(matches!(
        compute_pivot(&spread, &categories, &stages),
        Err(PivotError::Overflow(_))
    ));
}
