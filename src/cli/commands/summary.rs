//! Summary command - balance, income and expense

use super::report_failure;
use crate::cache::Summary;
use crate::cli::args::{FormatArgs, OutputFormat};
use crate::cli::App;
use crate::config::Config;
use crate::error::TallyResult;
use crate::navigation::HOME_PATH;
use crate::ui;
use console::style;

/// Execute the summary command
pub async fn execute(args: FormatArgs, config: &Config) -> TallyResult<()> {
    let app = App::open(config).await?;
    app.require(HOME_PATH)?;

    if let Err(e) = app.store.fetch_summary().await {
        report_failure(&app, &e);
        return Err(e);
    }
    let summary = app.store.snapshot().summary;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Plain => println!(
            "{:.2}\t{:.2}\t{:.2}",
            summary.balance, summary.income, summary.expense
        ),
        OutputFormat::Table => print_table(&app, &summary),
    }
    Ok(())
}

fn print_table(app: &App, summary: &Summary) {
    ui::intro(&app.ui, "Summary");
    let balance = format!("{:.2}", summary.balance);
    let balance = if summary.balance < 0.0 {
        style(balance).red()
    } else {
        style(balance).green()
    };
    println!("  {:<10} {:>14}", "Income", format!("{:.2}", summary.income));
    println!("  {:<10} {:>14}", "Expense", format!("{:.2}", summary.expense));
    println!("  {}", "-".repeat(25));
    println!("  {:<10} {:>14}", style("Balance").bold(), balance);
}
