use crate::error::PublishError;
use crate::table::{Cell, Table};
use crate::PublishSink;
use async_trait::async_trait;
use serde_json::{json, Value};

/// Publishes tables into a spreadsheet, one sheet per table, for final
/// beautification on the front end. The target sheet must already exist in
/// the spreadsheet.
pub struct SheetsSink {
    client: reqwest::Client,
    spreadsheet_id: String,
    access_token: String,
}

impl SheetsSink {
    pub fn new(spreadsheet_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            spreadsheet_id: spreadsheet_id.into(),
            access_token: access_token.into(),
        }
    }
}

fn cell_value(cell: &Cell) -> Value {
    match cell {
        Cell::Empty => Value::String(String::new()),
        Cell::Float(v) => json!(v),
        Cell::Text(s) => Value::String(s.clone()),
    }
}

fn table_values(table: &Table) -> Vec<Vec<Value>> {
    let mut values = Vec::with_capacity(table.rows().len() + 1);

    let mut header: Vec<Value> = vec![Value::String(String::new())];
    header.extend(table.columns().iter().map(|c| Value::String(c.clone())));
    values.push(header);

    for row in table.rows() {
        let mut cells: Vec<Value> = vec![Value::String(row.label.clone())];
        cells.extend(row.cells.iter().map(cell_value));
        values.push(cells);
    }

    values
}

#[async_trait]
impl PublishSink for SheetsSink {
    async fn publish(&self, table: &Table) -> Result<(), PublishError> {
        let range = format!("'{}'!A1", table.name());
        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}/values/{}",
            self.spreadsheet_id, range
        );

        let payload = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": table_values(table),
        });

        let response = self
            .client
            .put(&url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Rejected {
                table: table.name().to_string(),
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(table = table.name(), "updated spreadsheet");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_carry_header_row_and_row_labels() {
        let mut table = Table::new("7", vec!["a".to_string(), "b".to_string()]);
        table.push_row("a", vec![Cell::Float(1.0), Cell::Empty]);

        let values = table_values(&table);
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], vec![json!(""), json!("a"), json!("b")]);
        assert_eq!(values[1], vec![json!("a"), json!(1.0), json!("")]);
    }
}
