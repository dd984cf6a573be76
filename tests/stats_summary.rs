use fdl_rs::models::{GroupKey, LabelRow, MISSING_ROUTE};
use fdl_rs::stats::{average_by_year, average_by_year_and_route};

fn row(name: &str, route: Option<&str>, year: i32, num_ingredients: usize) -> LabelRow {
    LabelRow {
        generic_name: name.into(),
        route: route.map(Into::into),
        year,
        num_ingredients,
        manufacturer: "AstraZeneca Pharmaceuticals LP".into(),
    }
}

#[test]
fn average_by_year_groups_and_averages() {
    let rows = vec![
        row("omeprazole", Some("ORAL"), 2016, 10),
        row("ticagrelor", Some("ORAL"), 2017, 30),
        row("exenatide", Some("SUBCUTANEOUS"), 2017, 50),
        row("budesonide", None, 2017, 60),
    ];
    let got = average_by_year(&rows);
    assert_eq!(got.len(), 2);

    assert_eq!(
        got[0].key,
        GroupKey {
            year: 2016,
            route: None
        }
    );
    assert_eq!(got[0].count, 1);
    assert_eq!(got[0].avg_number_of_ingredients, 10.0);
    assert_eq!(got[0].drug_names, vec!["omeprazole".to_string()]);

    assert_eq!(got[1].key.year, 2017);
    assert_eq!(got[1].count, 3);
    assert!((got[1].avg_number_of_ingredients - 46.666666).abs() < 1e-4);
    assert_eq!(
        got[1].drug_names,
        vec![
            "ticagrelor".to_string(),
            "exenatide".to_string(),
            "budesonide".to_string()
        ]
    );
}

#[test]
fn average_by_year_and_route_uses_missing_sentinel() {
    let rows = vec![
        row("ticagrelor", Some("ORAL"), 2017, 30),
        row("omeprazole", Some("ORAL"), 2017, 40),
        row("exenatide", Some("SUBCUTANEOUS"), 2017, 12),
        row("budesonide", None, 2017, 7),
        row("fulvestrant", Some("INTRAMUSCULAR"), 2018, 9),
    ];
    let got = average_by_year_and_route(&rows);
    // Keys ordered by (year, route): ORAL < SUBCUTANEOUS < missing, then 2018.
    assert_eq!(got.len(), 4);

    assert_eq!(
        got[0].key,
        GroupKey {
            year: 2017,
            route: Some("ORAL".into())
        }
    );
    assert_eq!(got[0].count, 2);
    assert_eq!(got[0].avg_number_of_ingredients, 35.0);

    assert_eq!(got[1].key.route.as_deref(), Some("SUBCUTANEOUS"));
    assert_eq!(got[1].avg_number_of_ingredients, 12.0);

    assert_eq!(got[2].key.route.as_deref(), Some(MISSING_ROUTE));
    assert_eq!(got[2].drug_names, vec!["budesonide".to_string()]);

    assert_eq!(got[3].key.year, 2018);
    assert_eq!(got[3].key.route.as_deref(), Some("INTRAMUSCULAR"));
}

#[test]
fn empty_input_yields_no_groups() {
    assert!(average_by_year(&[]).is_empty());
    assert!(average_by_year_and_route(&[]).is_empty());
}
