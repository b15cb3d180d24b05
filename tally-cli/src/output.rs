use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use tally_core::{MonthTotals, Totals, Transaction};
use tally_ingest::{ParseOutcome, ParseReport};

use crate::config::OutputFormat;

#[derive(Serialize)]
struct JsonOutput<'a> {
    format: &'static str,
    transactions: &'a [Transaction],
    totals: Totals,
    monthly: Vec<MonthTotals>,
    report: &'a ParseReport,
}

pub fn write_outcome(outcome: &ParseOutcome, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    match format {
        OutputFormat::Table => write_table(outcome, out),
        OutputFormat::Json => {
            let doc = JsonOutput {
                format: outcome.format.tag(),
                transactions: &outcome.transactions,
                totals: Totals::from_transactions(&outcome.transactions),
                monthly: Totals::by_month(&outcome.transactions),
                report: &outcome.report,
            };
            serde_json::to_writer_pretty(&mut *out, &doc).context("serialize json")?;
            writeln!(out)?;
            Ok(())
        }
        OutputFormat::Csv => write_csv(&outcome.transactions, out),
    }
}

fn write_csv(txns: &[Transaction], out: &mut dyn Write) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["date", "description", "amount", "type", "source"])?;
    for t in txns {
        wtr.write_record([
            t.date.to_string(),
            t.description.clone(),
            t.amount.to_string(),
            t.kind.as_str().to_string(),
            t.source.tag().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_table(outcome: &ParseOutcome, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "# {} ({} transactions)\n", outcome.format.label(), outcome.transactions.len())?;

    for t in &outcome.transactions {
        let sign = if t.is_income() { '+' } else { '-' };
        writeln!(out, "{} | {:<40} | {}{:>12.2}", t.date, t.description, sign, t.amount)?;
    }

    let totals = Totals::from_transactions(&outcome.transactions);
    writeln!(
        out,
        "\nIncome: {:.2} | Expense: {:.2} | Net: {:.2}",
        totals.income, totals.expense, totals.balance
    )?;

    let months = Totals::by_month(&outcome.transactions);
    if months.len() > 1 {
        for m in &months {
            writeln!(
                out,
                "  {} | income {:>12.2} | expense {:>12.2}",
                m.key(),
                m.totals.income,
                m.totals.expense
            )?;
        }
    }

    let r = &outcome.report;
    writeln!(
        out,
        "Rows: {} matched, {} without amount, {} dropped, {} dated today",
        r.rows_matched, r.rows_skipped, r.candidates_dropped, r.dates_defaulted
    )?;
    Ok(())
}
