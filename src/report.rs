//! Rendering of reconciliation results

use bigdecimal::BigDecimal;
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::ingest::DateRange;
use crate::reconciliation::MatchResult;
use crate::types::*;

const RULE: &str = "---------------------------------------------------------";

/// Run details that live outside the match result
#[derive(Debug, Clone, Default)]
pub struct ReportContext {
    pub period: Option<DateRange>,
    /// Loaded transaction count per bank source
    pub bank_counts: BTreeMap<String, usize>,
}

/// Render a plain-text reconciliation report
pub fn render_text(result: &MatchResult, ctx: &ReportContext) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_text(&mut out, result, ctx);
    out
}

/// Render the full result as pretty-printed JSON
pub fn render_json(result: &MatchResult) -> ReconcileResult<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

fn write_text(out: &mut String, result: &MatchResult, ctx: &ReportContext) -> std::fmt::Result {
    writeln!(out, "RECONCILIATION REPORT")?;
    if let Some(period) = &ctx.period {
        writeln!(
            out,
            "Reconciliation Period: {} to {}",
            period.start.format("%Y-%m-%d"),
            period.end.format("%Y-%m-%d")
        )?;
    }
    writeln!(out)?;

    writeln!(out, "SUMMARY")?;
    writeln!(out, "{RULE}")?;
    writeln!(
        out,
        "Total Transactions Processed:   {}",
        result.total_system_txns + result.total_bank_txns
    )?;
    writeln!(out, "System transactions:            {}", result.total_system_txns)?;
    writeln!(out, "Bank transactions:              {}", result.total_bank_txns)?;
    for (bank, count) in &ctx.bank_counts {
        writeln!(out, "  {bank}: {count}")?;
    }
    writeln!(
        out,
        "Matched Transactions:           {} ({:.1}%)",
        result.total_matched, result.match_rate
    )?;
    writeln!(out, "Unmatched Transactions:         {}", result.total_unmatched())?;
    writeln!(out, "Unmatched system:               {}", result.unmatched_system.len())?;
    writeln!(out, "Unmatched bank:                 {}", result.unmatched_bank.len())?;
    writeln!(
        out,
        "Total Discrepancy Amount:       {}",
        money(&result.total_discrepancy)
    )?;
    writeln!(out)?;

    let discrepant: Vec<_> = result.pairs_with_discrepancy().collect();
    if !discrepant.is_empty() {
        writeln!(out, "MATCHED TRANSACTIONS WITH DISCREPANCIES")?;
        writeln!(out, "{RULE}")?;
        for pair in discrepant {
            writeln!(
                out,
                "System: {} ({}) <-> Bank: {} ({}) | Discrepancy: {}",
                pair.system_transaction.id,
                money(&pair.system_transaction.absolute_amount()),
                pair.bank_transaction.id,
                money(&pair.bank_transaction.absolute_amount()),
                money(&pair.amount_discrepancy)
            )?;
        }
        writeln!(out)?;
    }

    if !result.unmatched_system.is_empty() {
        writeln!(out, "UNMATCHED SYSTEM TRANSACTIONS")?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "Transactions in system but missing in bank statement(s):")?;
        writeln!(out)?;
        for txn in &result.unmatched_system {
            writeln!(
                out,
                "ID: {:<15} | Source: {:<10} | Type: {:<6} | Amount: {:>10} | Date: {}",
                txn.id,
                txn.source,
                txn.transaction_type.to_string(),
                money(&txn.absolute_amount()),
                txn.calendar_date().format("%Y-%m-%d")
            )?;
        }
        writeln!(out)?;
    }

    if !result.unmatched_bank.is_empty() {
        writeln!(out, "UNMATCHED BANK TRANSACTIONS")?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "Transactions in bank statement(s) but missing in system:")?;
        writeln!(out)?;

        let mut by_bank: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
        for txn in &result.unmatched_bank {
            by_bank.entry(txn.source.as_str()).or_default().push(txn);
        }

        for (bank, txns) in by_bank {
            writeln!(out, "{} ({} transactions):", bank, txns.len())?;
            for txn in txns {
                writeln!(
                    out,
                    "ID: {:<15} | Type: {:<6} | Amount: {:>10} | Date: {}",
                    txn.id,
                    txn.transaction_type.to_string(),
                    money(&txn.absolute_amount()),
                    txn.calendar_date().format("%Y-%m-%d")
                )?;
            }
            writeln!(out)?;
        }
    }

    Ok(())
}

/// Format an amount with exactly two decimals
fn money(amount: &BigDecimal) -> String {
    amount.round(2).with_scale(2).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciliation::ReconciliationEngine;
    use chrono::NaiveDate;

    fn txn(id: &str, source_type: SourceType, source: &str, amount: &str, t: TransactionType) -> Transaction {
        Transaction::new(
            id.to_string(),
            source_type,
            source.to_string(),
            NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            amount.parse().unwrap(),
            t,
        )
    }

    fn sample() -> MatchResult {
        let system = vec![
            txn("SYS001", SourceType::System, "BCA", "150.50", TransactionType::Debit),
            txn("SYS002", SourceType::System, "BCA", "99.9", TransactionType::Credit),
        ];
        let bank = vec![
            txn("B1", SourceType::Bank, "BCA", "-150.50", TransactionType::Debit),
            txn("B2", SourceType::Bank, "MANDIRI", "42", TransactionType::Credit),
            txn("B3", SourceType::Bank, "BCA", "7", TransactionType::Credit),
        ];
        ReconciliationEngine::new().reconcile(&system, &bank).unwrap()
    }

    #[test]
    fn test_money_format() {
        assert_eq!(money(&"150.5".parse().unwrap()), "150.50");
        assert_eq!(money(&BigDecimal::from(7)), "7.00");
    }

    #[test]
    fn test_render_text() {
        let ctx = ReportContext {
            period: Some(
                DateRange::new(
                    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
                )
                .unwrap(),
            ),
            bank_counts: BTreeMap::new(),
        };
        let text = render_text(&sample(), &ctx);

        assert!(text.contains("Reconciliation Period: 2024-03-01 to 2024-03-31"));
        assert!(text.contains("Total Transactions Processed:   5"));
        assert!(text.contains("Matched Transactions:           1 (40.0%)"));
        assert!(text.contains("Total Discrepancy Amount:       148.90"));
        assert!(text.contains("UNMATCHED SYSTEM TRANSACTIONS"));
        assert!(text.contains("ID: SYS002"));
        assert!(!text.contains("MATCHED TRANSACTIONS WITH DISCREPANCIES"));

        // Banks are listed alphabetically
        let bca = text.find("BCA (1 transactions):").unwrap();
        let mandiri = text.find("MANDIRI (1 transactions):").unwrap();
        assert!(bca < mandiri);
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["algorithm_used"], "exact");
        assert_eq!(value["total_matched"], 1);
        assert_eq!(value["unmatched_bank"].as_array().unwrap().len(), 2);
        assert_eq!(
            value["matched"][0]["system_transaction"]["transaction_type"],
            "DEBIT"
        );
    }
}
