//! Per-category CSV export.
//!
//! One file per non-empty category, named `{stem}_{category}.csv`.
//! Columns are the union of the fields actually present in that
//! category's items, in first-seen order, so sparse catch-all fields
//! still get a column.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::models::PidDocument;

use super::ExportError;

/// Write every non-empty category to its own CSV file under `out_dir`.
/// Returns the paths written.
pub fn write_category_csvs(
    document: &PidDocument,
    out_dir: &Path,
    stem: &str,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(out_dir)?;

    let value = serde_json::to_value(document)?;
    let mut written = Vec::new();

    let Value::Object(categories) = value else {
        return Ok(written);
    };

    for (category, items) in &categories {
        if category == "metadata" {
            continue;
        }
        let Some(items) = items.as_array() else {
            continue;
        };
        if items.is_empty() {
            continue;
        }

        let path = out_dir.join(format!("{stem}_{category}.csv"));
        write_items(items, &path)?;
        tracing::debug!(category, rows = items.len(), path = %path.display(), "CSV written");
        written.push(path);
    }

    Ok(written)
}

fn write_items(items: &[Value], path: &Path) -> Result<(), ExportError> {
    let mut columns: Vec<String> = Vec::new();
    for item in items {
        if let Some(fields) = item.as_object() {
            for key in fields.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&columns)?;

    for item in items {
        let fields = item.as_object();
        let record: Vec<String> = columns
            .iter()
            .map(|column| {
                fields
                    .and_then(|f| f.get(column))
                    .map(cell_text)
                    .unwrap_or_default()
            })
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Equipment, Valve};

    fn sample_document() -> PidDocument {
        let mut doc = PidDocument::default();
        doc.equipment.push(Equipment {
            tag: Some("P-101".into()),
            equipment_type: Some("Pump".into()),
            ..Default::default()
        });
        let mut exchanger = Equipment {
            tag: Some("E-201".into()),
            ..Default::default()
        };
        exchanger
            .base
            .extra
            .insert("service".into(), serde_json::json!("Cooling water"));
        doc.equipment.push(exchanger);
        doc.valves.push(Valve {
            tag: Some("XV-9".into()),
            ..Default::default()
        });
        doc
    }

    #[test]
    fn one_file_per_nonempty_category() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_category_csvs(&sample_document(), dir.path(), "unit").unwrap();

        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert!(names.contains(&"unit_equipment.csv".to_string()));
        assert!(names.contains(&"unit_valves.csv".to_string()));
        assert_eq!(written.len(), 2);
    }

    #[test]
    fn columns_union_sparse_fields() {
        let dir = tempfile::tempdir().unwrap();
        write_category_csvs(&sample_document(), dir.path(), "unit").unwrap();

        let contents =
            std::fs::read_to_string(dir.path().join("unit_equipment.csv")).unwrap();
        let mut lines = contents.lines();
        let header = lines.next().unwrap();
        assert!(header.contains("tag"));
        assert!(header.contains("service"));

        // First row has no service, second has no type.
        let first = lines.next().unwrap();
        assert!(first.contains("P-101"));
        assert!(first.contains("Pump"));
        let second = lines.next().unwrap();
        assert!(second.contains("E-201"));
        assert!(second.contains("Cooling water"));
    }

    #[test]
    fn empty_document_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let written =
            write_category_csvs(&PidDocument::default(), dir.path(), "unit").unwrap();
        assert!(written.is_empty());
    }
}
