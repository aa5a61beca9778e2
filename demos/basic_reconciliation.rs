//! Basic reconciliation example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use ledger_reconcile::report::{render_text, ReportContext};
use ledger_reconcile::{ReconciliationEngine, SourceType, Transaction, TransactionType};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Ledger Reconcile - Basic Example\n");

    let day = NaiveDate::from_ymd_opt(2024, 3, 15)
        .ok_or("invalid date")?
        .and_hms_opt(9, 0, 0)
        .ok_or("invalid time")?;

    // Internal books store debits as positive amounts
    let system = vec![
        Transaction::new(
            "SYS001".to_string(),
            SourceType::System,
            "BCA".to_string(),
            day,
            "150.50".parse::<BigDecimal>()?,
            TransactionType::Debit,
        ),
        Transaction::new(
            "SYS002".to_string(),
            SourceType::System,
            "BCA".to_string(),
            day,
            BigDecimal::from(1000),
            TransactionType::Credit,
        ),
        Transaction::new(
            "SYS003".to_string(),
            SourceType::System,
            "MANDIRI".to_string(),
            day,
            BigDecimal::from(75),
            TransactionType::Debit,
        ),
    ];

    // Bank statements store debits as negative amounts
    let bank = vec![
        Transaction::new(
            "BCA-0001".to_string(),
            SourceType::Bank,
            "BCA".to_string(),
            day,
            "-150.50".parse::<BigDecimal>()?,
            TransactionType::Debit,
        ),
        Transaction::new(
            "BCA-0002".to_string(),
            SourceType::Bank,
            "BCA".to_string(),
            day,
            BigDecimal::from(1000),
            TransactionType::Credit,
        ),
        Transaction::new(
            "MDR-0001".to_string(),
            SourceType::Bank,
            "MANDIRI".to_string(),
            day,
            BigDecimal::from(-20),
            TransactionType::Debit,
        ),
    ];

    let engine = ReconciliationEngine::new();
    let result = engine.reconcile(&system, &bank)?;

    for pair in &result.matched {
        println!(
            "  Matched {} <-> {} ({}% confidence)",
            pair.system_transaction.id, pair.bank_transaction.id, pair.confidence_score
        );
    }
    println!();

    print!("{}", render_text(&result, &ReportContext::default()));

    Ok(())
}
