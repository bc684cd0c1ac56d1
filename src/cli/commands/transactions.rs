//! Transactions command - list, add, update, delete

use super::report_failure;
use crate::cache::{CacheState, ResourceId, Transaction, TransactionKind, TransactionPayload};
use crate::cli::args::{OutputFormat, TransactionAction, TransactionFields, TransactionsArgs};
use crate::cli::App;
use crate::config::Config;
use crate::error::TallyResult;
use crate::navigation::HOME_PATH;
use crate::ui;
use console::style;

/// Execute the transactions command
pub async fn execute(args: TransactionsArgs, config: &Config) -> TallyResult<()> {
    let app = App::open(config).await?;
    app.require(HOME_PATH)?;

    let result = match args.action {
        TransactionAction::List(format) => list(&app, format.format).await,
        TransactionAction::Add(fields) => add(&app, fields).await,
        TransactionAction::Update { id, fields } => update(&app, id, fields).await,
        TransactionAction::Delete { id, yes } => delete(&app, id, yes).await,
    };

    if let Err(ref e) = result {
        report_failure(&app, e);
    }
    result
}

fn payload(fields: TransactionFields) -> TransactionPayload {
    TransactionPayload {
        description: fields.description,
        amount: fields.amount,
        kind: fields.kind.into(),
        category_id: fields.category,
    }
}

async fn list(app: &App, format: OutputFormat) -> TallyResult<()> {
    // Category names are needed for the table
    app.store.load_all().await?;
    let cache = app.store.snapshot();

    if cache.transactions.is_empty() {
        match format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => ui::step_info(&app.ui, "No transactions yet"),
        }
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_table(app, &cache),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cache.transactions)?),
        OutputFormat::Plain => {
            for t in &cache.transactions {
                println!(
                    "{}\t{}\t{}\t{:.2}\t{}",
                    t.id,
                    t.date.format("%Y-%m-%d"),
                    t.kind,
                    t.amount,
                    t.description
                );
            }
        }
    }
    Ok(())
}

fn category_name(cache: &CacheState, transaction: &Transaction) -> String {
    transaction
        .category_id
        .and_then(|id| cache.category(id))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "-".to_string())
}

fn print_table(app: &App, cache: &CacheState) {
    ui::intro(&app.ui, "Transactions");
    println!(
        "{:<6} {:<11} {:<28} {:<16} {:>12}",
        style("ID").bold(),
        style("DATE").bold(),
        style("DESCRIPTION").bold(),
        style("CATEGORY").bold(),
        style("AMOUNT").bold()
    );
    println!("{}", "-".repeat(77));

    for t in &cache.transactions {
        let amount = match t.kind {
            TransactionKind::Income => style(format!("+{:.2}", t.amount)).green(),
            TransactionKind::Expense => style(format!("-{:.2}", t.amount)).red(),
            TransactionKind::Other(_) => style(format!("{:.2}", t.amount)).yellow(),
        };
        println!(
            "{:<6} {:<11} {:<28} {:<16} {:>12}",
            t.id,
            t.date.format("%Y-%m-%d").to_string(),
            truncate(&t.description, 28),
            truncate(&category_name(cache, t), 16),
            amount
        );
    }

    println!();
    println!(
        "{} transaction(s), balance {:.2}",
        cache.transactions.len(),
        cache.summary.balance
    );
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

async fn add(app: &App, fields: TransactionFields) -> TallyResult<()> {
    let created = app.store.add_transaction(&payload(fields)).await?;
    ui::step_ok_detail(
        &app.ui,
        &format!("Recorded {} of {:.2}", created.kind, created.amount),
        &format!("id {}", created.id),
    );
    ui::remark(
        &app.ui,
        &format!("Balance: {:.2}", app.store.snapshot().summary.balance),
    );
    Ok(())
}

async fn update(app: &App, id: ResourceId, fields: TransactionFields) -> TallyResult<()> {
    let updated = app.store.update_transaction(id, &payload(fields)).await?;
    ui::step_ok(
        &app.ui,
        &format!("Updated transaction {} ({})", updated.id, updated.description),
    );
    Ok(())
}

async fn delete(app: &App, id: ResourceId, yes: bool) -> TallyResult<()> {
    let ctx = app.ui.clone().with_auto_yes(yes);
    if !ui::confirm(&ctx, &format!("Delete transaction {}?", id), false).await? {
        ui::step_info(&app.ui, "Nothing deleted");
        return Ok(());
    }

    app.store.delete_transaction(id).await?;
    ui::step_ok(&app.ui, &format!("Deleted transaction {}", id));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("Lunch", 10), "Lunch");
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("Weekly groceries run", 10), "Weekly ...");
    }
}
