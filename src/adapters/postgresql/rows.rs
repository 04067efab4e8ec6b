//! Conversion of store responses into domain values

use crate::domain::{BisyncError, ReportDefinition, Result, ResultSet};
use tokio_postgres::{Row, SimpleQueryMessage};

/// Build a [`ResultSet`] from the messages of a simple query
///
/// Values keep the textual form the server sent, so numeric and temporal
/// columns are exported without conversion. When the text holds several
/// statements, the last one that described rows wins.
pub fn result_set_from_messages(messages: Vec<SimpleQueryMessage>) -> Result<ResultSet> {
    let mut result = ResultSet::new(Vec::new());

    for message in messages {
        match message {
            SimpleQueryMessage::RowDescription(columns) => {
                result = ResultSet::new(columns.iter().map(|c| c.name().to_string()).collect());
            }
            SimpleQueryMessage::Row(row) => {
                if result.columns().is_empty() {
                    result = ResultSet::new(
                        row.columns().iter().map(|c| c.name().to_string()).collect(),
                    );
                }
                let mut values = Vec::with_capacity(row.len());
                for index in 0..row.len() {
                    let value = row.try_get(index).map_err(|e| {
                        BisyncError::QueryExecution(format!("Failed to read column {index}: {e}"))
                    })?;
                    values.push(value.map(str::to_string));
                }
                result.push_row(values)?;
            }
            _ => {}
        }
    }

    Ok(result)
}

/// Map one catalog row into a report definition
pub fn report_from_row(row: &Row) -> Result<ReportDefinition> {
    let read = |column: &str| -> Result<Option<String>> {
        row.try_get::<_, Option<String>>(column).map_err(|e| {
            BisyncError::QueryExecution(format!("Invalid catalog column '{column}': {e}"))
        })
    };

    let name = read("name")?.ok_or_else(|| {
        BisyncError::QueryExecution("Catalog row without a report name".to_string())
    })?;
    let base_query = read("query")?.unwrap_or_default();
    let flag = read("isetendobase")?.unwrap_or_default();

    let mut report = ReportDefinition::new(name, base_query);
    if ReportDefinition::vendor_flag(&flag) {
        report = report.vendor_base();
    }
    if let Some(custom) = read("cust_query")? {
        report = report.with_custom_query(custom);
    }
    Ok(report)
}
