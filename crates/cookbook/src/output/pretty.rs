//! Pretty output formatting.

use cookbook_client::CatalogRecipe;
use cookbook_core::recipe::Recipe;
use cookbook_core::sync::RefreshReport;

/// Format a recipe for display.
pub fn format_recipe(recipe: &Recipe) -> String {
    let status = match recipe.last_updated {
        Some(millis) => format!("synced {}", format_millis(millis)),
        None => "not synced".to_string(),
    };
    let mut output = format!(
        "{} [{}]\n  ID: {}\n  Owner: {}",
        recipe.title, status, recipe.id, recipe.owner_id
    );
    if let Some(url) = &recipe.image_url {
        output.push_str(&format!("\n  Image: {}", url));
    }
    if !recipe.description.is_empty() {
        output.push_str(&format!("\n  {}", first_line(&recipe.description)));
    }
    output
}

/// Format recipes for display.
pub fn format_recipes(recipes: &[Recipe]) -> String {
    if recipes.is_empty() {
        return "No recipes found.".to_string();
    }
    let mut output = format!("RECIPES ({})\n", recipes.len());
    output.push_str(&"-".repeat(40));
    for recipe in recipes {
        output.push_str(&format!("\n{}", format_recipe(recipe)));
        output.push('\n');
    }
    output
}

/// Format a catalogue result for display.
pub fn format_catalog_recipe(found: &CatalogRecipe) -> String {
    format!("{}\n  External ID: {}", found.title, found.external_id)
}

/// Format catalogue results for display.
pub fn format_catalog_recipes(results: &[CatalogRecipe]) -> String {
    if results.is_empty() {
        return "No catalogue matches.".to_string();
    }
    let mut output = format!("CATALOGUE ({})\n", results.len());
    output.push_str(&"-".repeat(40));
    for found in results {
        output.push_str(&format!("\n{}", format_catalog_recipe(found)));
        output.push('\n');
    }
    output
}

/// Format a refresh outcome.
pub fn format_refresh(report: &RefreshReport) -> String {
    if report.advanced() {
        format!(
            "Fetched {} recipe(s), cursor {} -> {}",
            report.fetched, report.cursor_before, report.cursor_after
        )
    } else {
        format!(
            "Fetched {} recipe(s), already up to date at {}",
            report.fetched, report.cursor_after
        )
    }
}

fn format_millis(millis: i64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
