//! Categories command - list, add, update, delete

use super::report_failure;
use crate::cache::{Category, CategoryPayload, ResourceId, DEFAULT_CATEGORY_COLOR};
use crate::cli::args::{CategoriesArgs, CategoryAction, OutputFormat};
use crate::cli::App;
use crate::config::Config;
use crate::error::TallyResult;
use crate::store::DeleteOutcome;
use crate::ui;
use console::style;

const ROUTE: &str = "/categories";

/// Execute the categories command
pub async fn execute(args: CategoriesArgs, config: &Config) -> TallyResult<()> {
    let app = App::open(config).await?;
    app.require(ROUTE)?;

    let result = match args.action {
        CategoryAction::List(format) => list(&app, format.format).await,
        CategoryAction::Add { name, color } => add(&app, payload(name, color)).await,
        CategoryAction::Update { id, name, color } => {
            update(&app, id, payload(name, color)).await
        }
        CategoryAction::Delete { id, yes } => delete(&app, id, yes).await,
    };

    if let Err(ref e) = result {
        report_failure(&app, e);
    }
    result
}

fn payload(name: String, color: Option<String>) -> CategoryPayload {
    let payload = CategoryPayload::new(name);
    match color {
        Some(color) => payload.with_color(color),
        None => payload,
    }
}

async fn list(app: &App, format: OutputFormat) -> TallyResult<()> {
    app.store.fetch_categories().await?;
    let categories = app.store.snapshot().categories;

    if categories.is_empty() {
        match format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => ui::step_info(&app.ui, "No categories yet"),
        }
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_table(app, &categories),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&categories)?),
        OutputFormat::Plain => {
            for category in &categories {
                println!("{}\t{}", category.id, category.name);
            }
        }
    }
    Ok(())
}

fn print_table(app: &App, categories: &[Category]) {
    ui::intro(&app.ui, "Categories");
    println!(
        "{:<6} {:<24} {:<10}",
        style("ID").bold(),
        style("NAME").bold(),
        style("COLOR").bold()
    );
    println!("{}", "-".repeat(42));
    for category in categories {
        println!(
            "{:<6} {:<24} {:<10}",
            category.id,
            category.name,
            category.color.as_deref().unwrap_or(DEFAULT_CATEGORY_COLOR)
        );
    }
    println!();
    println!("{} category(ies)", categories.len());
}

async fn add(app: &App, payload: CategoryPayload) -> TallyResult<()> {
    let created = app.store.add_category(&payload).await?;
    ui::step_ok_detail(
        &app.ui,
        &format!("Created category {}", created.name),
        &format!("id {}", created.id),
    );
    Ok(())
}

async fn update(app: &App, id: ResourceId, payload: CategoryPayload) -> TallyResult<()> {
    let updated = app.store.update_category(id, &payload).await?;
    ui::step_ok(&app.ui, &format!("Updated category {} ({})", updated.id, updated.name));
    Ok(())
}

async fn delete(app: &App, id: ResourceId, yes: bool) -> TallyResult<()> {
    let ctx = app.ui.clone().with_auto_yes(yes);
    if !ui::confirm(&ctx, &format!("Delete category {}?", id), false).await? {
        ui::step_info(&app.ui, "Nothing deleted");
        return Ok(());
    }

    match app.store.delete_category(id).await? {
        DeleteOutcome::Deleted => ui::step_ok(&app.ui, &format!("Deleted category {}", id)),
        DeleteOutcome::Blocked(conflict) => ui::step_warn_hint(
            &app.ui,
            &conflict.to_string(),
            "Delete or move its transactions first",
        ),
    }
    Ok(())
}
