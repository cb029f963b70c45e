//! SQLite row conversion functions.
//!
//! Column order follows the SELECT statements in `schema`.

use cookbook_core::recipe::{Recipe, User};
use rusqlite::types::Type;
use rusqlite::Row;

/// Convert a SQLite row to a Recipe.
///
/// Expected columns: id, title, description, image_url, owner_id, last_updated
pub fn row_to_recipe(row: &Row) -> rusqlite::Result<Recipe> {
    let last_updated: Option<i64> = row.get(5)?;

    Ok(Recipe {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        image_url: row.get(3)?,
        owner_id: row.get(4)?,
        last_updated: last_updated.map(check_timestamp).transpose()?,
    })
}

/// Convert a SQLite row to a User.
///
/// Expected columns: id, display_name, avatar_url
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        display_name: row.get(1)?,
        avatar_url: row.get(2)?,
    })
}

/// Rejects timestamps no remote could have produced.
fn check_timestamp(millis: i64) -> rusqlite::Result<i64> {
    if millis < 0 {
        return Err(rusqlite::Error::FromSqlConversionFailure(
            5,
            Type::Integer,
            format!("negative last_updated: {millis}").into(),
        ));
    }
    Ok(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_timestamp_accepts_epoch() {
        assert_eq!(check_timestamp(0).unwrap(), 0);
        assert_eq!(check_timestamp(1_700_000_000_000).unwrap(), 1_700_000_000_000);
    }

    #[test]
    fn test_check_timestamp_rejects_negative() {
        assert!(matches!(
            check_timestamp(-1),
            Err(rusqlite::Error::FromSqlConversionFailure(5, Type::Integer, _))
        ));
    }

    #[test]
    fn test_row_to_recipe_reads_nullable_columns() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let recipe = conn
            .query_row(
                "SELECT 'r1', 'Pho', 'Soup', NULL, 'alice', NULL",
                [],
                row_to_recipe,
            )
            .unwrap();

        assert_eq!(recipe.id, "r1");
        assert_eq!(recipe.image_url, None);
        assert_eq!(recipe.last_updated, None);
    }

    #[test]
    fn test_row_to_user() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let user = conn
            .query_row(
                "SELECT 'alice', 'Alice', 'https://img/a.png'",
                [],
                row_to_user,
            )
            .unwrap();

        assert_eq!(user.display_name, "Alice");
        assert_eq!(user.avatar_url.as_deref(), Some("https://img/a.png"));
    }
}
