//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Recipes table
CREATE TABLE IF NOT EXISTS recipes (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    image_url TEXT,
    owner_id TEXT NOT NULL,
    last_updated INTEGER
);

-- Users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    display_name TEXT NOT NULL,
    avatar_url TEXT
);

CREATE INDEX IF NOT EXISTS idx_recipes_owner_id ON recipes(owner_id);
"#;

// Recipe queries
pub const UPSERT_RECIPE: &str = r#"
INSERT INTO recipes (id, title, description, image_url, owner_id, last_updated)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
ON CONFLICT(id) DO UPDATE SET
    title = excluded.title,
    description = excluded.description,
    image_url = excluded.image_url,
    owner_id = excluded.owner_id,
    last_updated = excluded.last_updated
"#;

pub const SELECT_RECIPE_BY_ID: &str = r#"
SELECT id, title, description, image_url, owner_id, last_updated
FROM recipes
WHERE id = ?1
"#;

/// Feed order: unsynced rows first, then newest first, ties by id.
pub const SELECT_ALL_RECIPES: &str = r#"
SELECT id, title, description, image_url, owner_id, last_updated
FROM recipes
ORDER BY last_updated IS NOT NULL, last_updated DESC, id ASC
"#;

pub const DELETE_RECIPE: &str = r#"
DELETE FROM recipes
WHERE id = ?1
"#;

// User queries
pub const UPSERT_USER: &str = r#"
INSERT INTO users (id, display_name, avatar_url)
VALUES (?1, ?2, ?3)
ON CONFLICT(id) DO UPDATE SET
    display_name = excluded.display_name,
    avatar_url = excluded.avatar_url
"#;

pub const SELECT_USER_BY_ID: &str = r#"
SELECT id, display_name, avatar_url
FROM users
WHERE id = ?1
"#;
