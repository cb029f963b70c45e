//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;

/// Offline-first recipe sharing from the command line.
#[derive(Debug, Parser)]
#[command(name = "cookbook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database path.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Sync cursor file path.
    #[arg(long, global = true)]
    pub cursor_file: Option<String>,

    /// Remote document API base URL.
    #[arg(long, global = true)]
    pub remote_url: Option<String>,

    /// Bearer token used as the acting identity for writes.
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Signed-in user ID, owner of newly created recipes.
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Recipe catalogue base URL.
    #[arg(long, global = true)]
    pub catalog_url: Option<String>,

    /// Keep the Local Store and cursor in memory for this run only.
    #[arg(long, global = true)]
    pub in_memory: bool,

    /// Output format.
    #[arg(long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Overrides `config` with any flag given on the command line.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(cursor_file) = &self.cursor_file {
            config.cursor_path = cursor_file.clone();
        }
        if let Some(remote_url) = &self.remote_url {
            config.remote_url = remote_url.clone();
        }
        if let Some(token) = &self.token {
            config.auth_token = Some(token.clone());
        }
        if let Some(user) = &self.user {
            config.user_id = Some(user.clone());
        }
        if let Some(catalog_url) = &self.catalog_url {
            config.catalog_url = catalog_url.clone();
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Pull remote changes since the last sync.
    Refresh,
    /// List cached recipes.
    List {
        /// Only recipes by this author.
        #[arg(long)]
        owner: Option<String>,
    },
    /// Show one recipe, fetching it if it is not cached.
    Show { id: String },
    /// Create a recipe.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Edit a recipe you own.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Delete a recipe you own.
    Delete { id: String },
    /// Print the recipe feed on every change until Ctrl+C.
    Watch {
        /// Only recipes by this author.
        #[arg(long)]
        owner: Option<String>,
    },
    /// Search the public recipe catalogue.
    Search { query: String },
    /// Import a catalogue recipe as your own.
    Import { external_id: String },
    /// Print the sync cursor.
    Cursor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "cookbook",
            "--db",
            "other.db",
            "--user",
            "alice",
            "list",
            "--owner",
            "alice",
        ]);
        let mut config = Config {
            db_path: "cookbook.db".to_string(),
            cursor_path: "cookbook.cursor.json".to_string(),
            remote_url: "http://localhost:3000".to_string(),
            auth_token: Some("from-env".to_string()),
            user_id: None,
            catalog_url: "http://catalog".to_string(),
            http_timeout_secs: 10,
        };

        cli.apply_to(&mut config);

        assert_eq!(config.db_path, "other.db");
        assert_eq!(config.user_id.as_deref(), Some("alice"));
        assert_eq!(config.auth_token.as_deref(), Some("from-env"));
        assert!(matches!(cli.command, Commands::List { owner: Some(_) }));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["cookbook", "refresh", "--in-memory", "--format", "json"]);

        assert!(cli.in_memory);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_update_takes_optional_fields() {
        let cli = Cli::parse_from(["cookbook", "update", "r1", "--title", "Better"]);

        match cli.command {
            Commands::Update {
                id,
                title,
                description,
                image_url,
            } => {
                assert_eq!(id, "r1");
                assert_eq!(title.as_deref(), Some("Better"));
                assert_eq!(description, None);
                assert_eq!(image_url, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
