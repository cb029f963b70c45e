//! cookbook CLI entry point.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::signal;
use tokio_stream::StreamExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cookbook::cli::{Cli, Commands, OutputFormat};
use cookbook::cursor::{FileCursorStore, MemoryCursorStore};
use cookbook::output::{format_output, pretty};
use cookbook::storage::InMemoryStore;
use cookbook::{Config, RecipeRepository};
use cookbook_client::{CatalogClient, CookbookClient};
use cookbook_core::recipe::{apply_patch, Recipe, RecipePatch};
use cookbook_core::storage::LocalStore;
use cookbook_core::sync::CursorStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `--format json` output stays machine readable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cookbook=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    cli.apply_to(&mut config);
    let format = cli.format;

    match cli.command {
        Commands::Search { query } => {
            let catalog = CatalogClient::new(&config.catalog_url, config.http_timeout())?;
            let results = catalog.search(&query).await?;
            match format {
                OutputFormat::Json => println!("{}", format_output(&results, format)),
                OutputFormat::Pretty => println!("{}", pretty::format_catalog_recipes(&results)),
            }
        }
        Commands::Import { external_id } => {
            let owner = signed_in_user(&config)?;
            let catalog = CatalogClient::new(&config.catalog_url, config.http_timeout())?;
            let found = catalog
                .lookup(&external_id)
                .await?
                .with_context(|| format!("catalogue has no recipe {external_id}"))?;

            let repo = build_repository(&config, cli.in_memory).await?;
            let created = repo.create(&found.into_recipe(owner)).await?;
            print_recipe("Imported", &created, format);
        }
        Commands::Refresh => {
            let repo = build_repository(&config, cli.in_memory).await?;
            let report = repo.refresh().await?;
            match format {
                OutputFormat::Json => println!("{}", format_output(&report, format)),
                OutputFormat::Pretty => println!("{}", pretty::format_refresh(&report)),
            }
        }
        Commands::List { owner } => {
            let repo = build_repository(&config, cli.in_memory).await?;
            let mut recipes = repo.all_recipes().await?;
            if let Some(owner) = owner {
                recipes.retain(|recipe| recipe.is_owned_by(&owner));
            }
            print_recipes(&recipes, format);
        }
        Commands::Show { id } => {
            let repo = build_repository(&config, cli.in_memory).await?;
            let recipe = find_recipe(&repo, &id).await?;
            match format {
                OutputFormat::Json => println!("{}", format_output(&recipe, format)),
                OutputFormat::Pretty => println!("{}", pretty::format_recipe(&recipe)),
            }
        }
        Commands::Create {
            title,
            description,
            image_url,
        } => {
            let owner = signed_in_user(&config)?;
            let mut draft = Recipe::new(owner, title, description);
            draft.image_url = image_url;

            let repo = build_repository(&config, cli.in_memory).await?;
            let created = repo.create(&draft).await?;
            print_recipe("Created", &created, format);
        }
        Commands::Update {
            id,
            title,
            description,
            image_url,
        } => {
            let patch = RecipePatch {
                title,
                description,
                image_url,
            };
            if patch.is_empty() {
                bail!("nothing to update: pass --title, --description or --image-url");
            }

            let repo = build_repository(&config, cli.in_memory).await?;
            let current = find_recipe(&repo, &id).await?;
            let updated = repo.update(&apply_patch(&current, patch)).await?;
            print_recipe("Updated", &updated, format);
        }
        Commands::Delete { id } => {
            let repo = build_repository(&config, cli.in_memory).await?;
            let recipe = find_recipe(&repo, &id).await?;
            repo.delete(&recipe).await?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ "deleted": recipe.id }))
                }
                OutputFormat::Pretty => println!("Deleted recipe {}", recipe.id),
            }
        }
        Commands::Watch { owner } => {
            let repo = build_repository(&config, cli.in_memory).await?;
            watch(&repo, owner, format).await;
        }
        Commands::Cursor => {
            let repo = build_repository(&config, cli.in_memory).await?;
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({ "last_synced_millis": repo.cursor() })
                ),
                OutputFormat::Pretty => println!("Last synced at {}", repo.cursor()),
            }
        }
    }

    Ok(())
}

/// Wires the Local Store, Remote Source and cursor store into a repository.
async fn build_repository(config: &Config, in_memory: bool) -> Result<RecipeRepository> {
    let mut remote = CookbookClient::new(&config.remote_url, config.http_timeout())?;
    if let Some(token) = &config.auth_token {
        remote = remote.with_token(token);
    }

    let (store, cursors): (Arc<dyn LocalStore>, Arc<dyn CursorStore>) = if in_memory {
        (
            Arc::new(InMemoryStore::new()),
            Arc::new(MemoryCursorStore::new()),
        )
    } else {
        (
            open_store(&config.db_path).await?,
            Arc::new(FileCursorStore::new(&config.cursor_path)),
        )
    };

    tracing::debug!(
        remote = %config.remote_url,
        in_memory,
        "Building recipe repository"
    );
    Ok(RecipeRepository::new(store, Arc::new(remote), cursors).await?)
}

#[cfg(feature = "sqlite")]
async fn open_store(path: &str) -> Result<Arc<dyn LocalStore>> {
    let store = cookbook::storage::SqliteStore::new(path)
        .await
        .with_context(|| format!("failed to open local store at {path}"))?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "sqlite"))]
async fn open_store(path: &str) -> Result<Arc<dyn LocalStore>> {
    tracing::warn!(path, "Built without SQLite support, using an in-memory store");
    Ok(Arc::new(InMemoryStore::new()))
}

fn signed_in_user(config: &Config) -> Result<String> {
    config
        .user_id
        .clone()
        .context("no signed-in user: pass --user or set COOKBOOK_USER_ID")
}

async fn find_recipe(repo: &RecipeRepository, id: &str) -> Result<Recipe> {
    repo.recipe(id)
        .await?
        .with_context(|| format!("recipe {id} not found"))
}

fn print_recipe(action: &str, recipe: &Recipe, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", format_output(recipe, format)),
        OutputFormat::Pretty => println!("{}:\n{}", action, pretty::format_recipe(recipe)),
    }
}

fn print_recipes(recipes: &[Recipe], format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", format_output(&recipes, format)),
        OutputFormat::Pretty => println!("{}", pretty::format_recipes(recipes)),
    }
}

/// Prints every delivery of the live feed until Ctrl+C.
async fn watch(repo: &RecipeRepository, owner: Option<String>, format: OutputFormat) {
    let live = match owner {
        Some(owner) => repo.observe_by_owner(owner),
        None => repo.observe_all(),
    };
    let feed = live.into_stream();
    tokio::pin!(feed);

    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            delivery = feed.next() => match delivery {
                Some(recipes) => print_recipes(&recipes, format),
                None => break,
            },
            _ = &mut ctrl_c => {
                tracing::info!("Received Ctrl+C, stopping watch");
                break;
            }
        }
    }
}
