//! Strict JSONL reader for historical tickets.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::errors::IndexError;
use crate::record::HistoricalTicket;

/// Reads [`HistoricalTicket`] rows, one JSON object per line.
///
/// Empty lines are skipped. A malformed row fails the whole read with its
/// 1-based line number.
pub fn read_tickets(jsonl_path: impl AsRef<Path>) -> Result<Vec<HistoricalTicket>, IndexError> {
    info!("Reading historical tickets JSONL: {:?}", jsonl_path.as_ref());

    let file = File::open(jsonl_path.as_ref())?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let row: HistoricalTicket = serde_json::from_str(&line)
            .map_err(|e| IndexError::Parse(format!("line {} parse error: {}", i + 1, e)))?;
        if row.issue_summary.trim().is_empty() {
            return Err(IndexError::Parse(format!(
                "line {}: empty issue_summary for ticket {}",
                i + 1,
                row.ticket_id
            )));
        }
        out.push(row);
    }

    debug!("Loaded {} historical tickets", out.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_rows_and_skips_blank_lines() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            r#"{{"ticket_id":"T1","issue_summary":"VPN drops","solution":"Reset tunnel","ticket_open_date":"2024-01-01 09:00:00","resolution_date":"2024-01-01 15:00:00","assigned_team":"Network"}}"#
        )
        .unwrap();
        writeln!(f).unwrap();
        writeln!(
            f,
            r#"{{"Ticket_ID":"T2","Issue_Category":"Refund missing","Assigned_To_Team":"Payments"}}"#
        )
        .unwrap();

        let rows = read_tickets(f.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].assigned_team, "Network");
        assert_eq!(rows[1].ticket_id, "T2");
        assert_eq!(rows[1].resolution_date, None);
        assert!(rows[1].solution.is_empty());
    }

    #[test]
    fn malformed_row_reports_line_number() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, r#"{{"ticket_id":"T1","issue_summary":"x","assigned_team":"Device"}}"#).unwrap();
        writeln!(f, "not json").unwrap();

        let err = read_tickets(f.path()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
