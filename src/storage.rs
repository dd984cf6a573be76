use crate::models::LabelRow;
use crate::stats::IngredientSummary;
use anyhow::Result;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save extracted rows as CSV with header.
pub fn save_csv<P: AsRef<Path>>(rows: &[LabelRow], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize((
        "generic_name",
        "route",
        "year",
        "num_ingredients",
        "manufacturer",
    ))?;
    for r in rows {
        wtr.serialize((
            &r.generic_name,
            &r.route,
            r.year,
            r.num_ingredients,
            &r.manufacturer,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save extracted rows as pretty JSON array.
pub fn save_json<P: AsRef<Path>>(rows: &[LabelRow], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(rows)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Save aggregates as CSV with header. Drug-name lists are joined with `;`.
pub fn save_summary_csv<P: AsRef<Path>>(summaries: &[IngredientSummary], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize((
        "year",
        "route",
        "count",
        "avg_number_of_ingredients",
        "drug_names",
    ))?;
    for s in summaries {
        wtr.serialize((
            s.key.year,
            s.key.route.as_deref().unwrap_or(""),
            s.count,
            s.avg_number_of_ingredients,
            s.drug_names.join(";"),
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save aggregates as pretty JSON array.
pub fn save_summary_json<P: AsRef<Path>>(summaries: &[IngredientSummary], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(summaries)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LabelRow;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let rows = vec![LabelRow {
            generic_name: "omeprazole".into(),
            route: Some("ORAL".into()),
            year: 2017,
            num_ingredients: 12,
            manufacturer: "AstraZeneca Pharmaceuticals LP".into(),
        }];
        save_csv(&rows, &csvp).unwrap();
        save_json(&rows, &jsonp).unwrap();
        assert!(csvp.exists());
        assert!(jsonp.exists());

        let reloaded: Vec<LabelRow> =
            serde_json::from_str(&std::fs::read_to_string(&jsonp).unwrap()).unwrap();
        assert_eq!(reloaded, rows);
    }
}
