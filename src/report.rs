//! Rendering of reconciliation outcomes for people and machines

use std::fmt;

use crate::reconciliation::Reconciliation;
use crate::types::*;

/// Output format of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// Summary counts followed by tables of unmatched records
    #[default]
    Text,
    /// The full outcome as pretty-printed JSON
    Json,
}

/// Render `result` in the requested format
pub fn render(result: &Reconciliation, format: ReportFormat) -> ReconResult<String> {
    match format {
        ReportFormat::Text => Ok(render_text(result)),
        ReportFormat::Json => render_json(result),
    }
}

pub fn render_json(result: &Reconciliation) -> ReconResult<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Render the summary and, when anything is left over, the unmatched details
pub fn render_text(result: &Reconciliation) -> String {
    result.to_string()
}

impl fmt::Display for Reconciliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Processed Transactions: {}", self.processed)?;
        writeln!(f, "Matched Transactions: {}", self.matched)?;
        writeln!(f, "Unmatched Transactions: {}", self.unmatched_count())?;

        if self.is_fully_matched() {
            return Ok(());
        }

        f.write_str("------------------\n")?;
        f.write_str("Unmatched Details:\n")?;

        if !self.unmatched.transactions.is_empty() {
            writeln!(
                f,
                "\nUnmatched Transactions: {}\n",
                self.unmatched_transaction_count()
            )?;
            let rows: Vec<Vec<String>> = self
                .unmatched
                .transactions
                .iter()
                .map(|t| {
                    vec![
                        t.id.clone(),
                        t.polarity.to_string(),
                        t.amount.to_string(),
                        t.time.format("%Y-%m-%d %H:%M:%S").to_string(),
                    ]
                })
                .collect();
            write_table(f, &["TrxID", "Type", "Amount", "TransactionTime"], &rows)?;
        }

        if self.unmatched_statement_count() > 0 {
            writeln!(
                f,
                "\nUnmatched Statements: {}\n",
                self.unmatched_statement_count()
            )?;
            let rows: Vec<Vec<String>> = self
                .unmatched
                .statements
                .iter()
                .flat_map(|(origin, lines)| {
                    lines.iter().map(move |s| {
                        vec![
                            origin.clone(),
                            s.id.clone(),
                            s.amount.to_string(),
                            s.date.format("%Y-%m-%d").to_string(),
                        ]
                    })
                })
                .collect();
            write_table(f, &["File", "UniqueIdentifier", "Amount", "Date"], &rows)?;
        }

        Ok(())
    }
}

/// Write an indented table with columns padded to their widest cell
fn write_table(out: &mut impl fmt::Write, header: &[&str], rows: &[Vec<String>]) -> fmt::Result {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    write_row(out, &widths, header.iter().copied())?;
    for row in rows {
        write_row(out, &widths, row.iter().map(String::as_str))?;
    }
    Ok(())
}

fn write_row<'a>(
    out: &mut impl fmt::Write,
    widths: &[usize],
    cells: impl Iterator<Item = &'a str>,
) -> fmt::Result {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    writeln!(out, "    {}", line.join("  ").trim_end())
}
