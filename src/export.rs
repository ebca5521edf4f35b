/// CSV export of the last batch run.
use crate::models::BatchRow;

pub const CSV_FILENAME: &str = "hasil_analisis_sentimen.csv";
pub const CSV_HEADER: &str = "Text,Sentiment,Confidence";

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Serialize rows as CSV: every value quoted, rows joined with `\n`.
///
/// `None` when there is nothing to export.
pub fn batch_csv(rows: &[BatchRow]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for row in rows {
        lines.push(format!(
            "{},{},{}",
            quote(&row.text),
            quote(row.sentiment.as_str()),
            quote(&row.confidence.to_string())
        ));
    }
    Some(lines.join("\n"))
}
