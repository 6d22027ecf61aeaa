use serde::Serialize;

/// One value in a published table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// An undefined value; rendered as an empty cell, never as a number.
    Empty,
    Float(f64),
    Text(String),
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) => Cell::Float(v),
            None => Cell::Empty,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// One labelled row of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub label: String,
    pub cells: Vec<Cell>,
}

/// A named grid of labelled cells: the unit of publication. The name keys
/// the destination object/sheet; rows and columns carry their own labels so
/// the sink needs no further context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a labelled row. `cells` must match the column count.
    pub fn push_row(&mut self, label: impl Into<String>, cells: Vec<Cell>) {
        debug_assert_eq!(cells.len(), self.columns.len());
        self.rows.push(Row {
            label: label.into(),
            cells,
        });
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Renders the table as CSV: a corner cell, the column labels, then one
    /// labelled row per line. Undefined cells stay empty.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();

        out.push_str(&escape_csv(""));
        for column in &self.columns {
            out.push(',');
            out.push_str(&escape_csv(column));
        }
        out.push('\n');

        for row in &self.rows {
            out.push_str(&escape_csv(&row.label));
            for cell in &row.cells {
                out.push(',');
                match cell {
                    Cell::Empty => {}
                    Cell::Float(v) => out.push_str(&v.to_string()),
                    Cell::Text(s) => out.push_str(&escape_csv(s)),
                }
            }
            out.push('\n');
        }

        out
    }
}

fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_renders_labels_and_empty_cells() {
        let mut table = Table::new(
            "matrix-7day",
            vec!["bitcoin".to_string(), "AAPL".to_string()],
        );
        table.push_row("bitcoin", vec![Cell::Float(1.0), Cell::Empty]);
        table.push_row("AAPL", vec![Cell::Float(0.5), Cell::Float(1.0)]);

        assert_eq!(table.to_csv(), ",bitcoin,AAPL\nbitcoin,1,\nAAPL,0.5,1\n");
    }

    #[test]
    fn csv_escapes_fields_with_commas_and_quotes() {
        let mut table = Table::new("anomaly", vec!["Description".to_string()]);
        table.push_row("rule", vec![Cell::from("triggers when x > 0.5, \"daily\"")]);

        assert_eq!(
            table.to_csv(),
            ",Description\nrule,\"triggers when x > 0.5, \"\"daily\"\"\"\n"
        );
    }
}
