//! Preview table derived from a [`DataSet`].
//!
//! Columns are the keys of the first row. Each previewed row contributes its own values in its own
//! order, so rows with a different column set than the first one render misaligned rather than
//! being reshaped.

use std::fmt::Write;

use crate::types::DataSet;

/// Number of rows a preview shows by default.
pub const PREVIEW_ROW_LIMIT: usize = 10;

/// The first rows of a dataset, rendered to strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    /// Column headers (keys of the first row).
    pub columns: Vec<String>,
    /// Rendered cells, one vector per previewed row.
    pub rows: Vec<Vec<String>>,
}

impl Preview {
    /// Build a preview of at most `limit` rows.
    ///
    /// Returns `None` for an empty dataset: no table is shown.
    pub fn from_dataset(dataset: &DataSet, limit: usize) -> Option<Self> {
        if dataset.is_empty() {
            return None;
        }
        let columns = dataset.columns().into_iter().map(str::to_owned).collect();
        let rows = dataset
            .rows
            .iter()
            .take(limit)
            .map(|row| row.values().map(|v| v.to_string()).collect())
            .collect();
        Some(Self { columns, rows })
    }

    /// Render as a plain-text table with padded columns.
    pub fn render_text(&self) -> String {
        let width = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.columns.len()))
            .max()
            .unwrap_or(0);
        let mut widths = vec![0usize; width];
        for line in std::iter::once(&self.columns).chain(self.rows.iter()) {
            for (i, cell) in line.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut out = String::new();
        write_line(&mut out, &self.columns, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(&mut out, &rule, &widths);
        for row in &self.rows {
            write_line(&mut out, row, &widths);
        }
        out
    }
}

fn write_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str(" | ");
        }
        let _ = write!(line, "{cell:<w$}", w = widths[i]);
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::{Preview, PREVIEW_ROW_LIMIT};
    use crate::types::{DataSet, Row, Value};

    fn numbered(n: usize) -> DataSet {
        let rows = (0..n)
            .map(|i| {
                [("id", Value::Int64(i as i64)), ("note", Value::Null)]
                    .into_iter()
                    .collect::<Row>()
            })
            .collect();
        DataSet::new(rows)
    }

    #[test]
    fn empty_dataset_has_no_preview() {
        assert!(Preview::from_dataset(&DataSet::default(), PREVIEW_ROW_LIMIT).is_none());
    }

    #[test]
    fn preview_is_capped_at_limit() {
        let preview = Preview::from_dataset(&numbered(25), PREVIEW_ROW_LIMIT).unwrap();
        assert_eq!(preview.columns, vec!["id", "note"]);
        assert_eq!(preview.rows.len(), 10);
        assert_eq!(preview.rows[9], vec!["9".to_string(), String::new()]);
    }

    #[test]
    fn heterogeneous_rows_keep_their_own_values() {
        let first: Row = [("a", Value::from("1")), ("b", Value::from("2"))].into_iter().collect();
        let second: Row = [("a", Value::from("3"))].into_iter().collect();
        let preview = Preview::from_dataset(&DataSet::new(vec![first, second]), 10).unwrap();

        assert_eq!(preview.rows[1], vec!["3".to_string()]);
    }

    #[test]
    fn render_text_pads_columns() {
        let preview = Preview {
            columns: vec!["Code".to_string(), "Price".to_string()],
            rows: vec![vec!["CLI-0001".to_string(), "120".to_string()]],
        };
        assert_eq!(
            preview.render_text(),
            "Code     | Price\n-------- | -----\nCLI-0001 | 120\n"
        );
    }
}
