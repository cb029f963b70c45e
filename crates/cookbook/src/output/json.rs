//! JSON output formatting.

/// Format a value as a single JSON line.
pub fn format_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cookbook_core::recipe::Recipe;

    #[test]
    fn test_recipe_is_one_camel_case_line() {
        let recipe = Recipe::new("alice", "Pho", "Soup").with_id("r1");

        let line = format_json(&recipe);

        assert!(!line.contains('\n'));
        assert!(line.contains(r#""ownerId":"alice""#));
    }
}
