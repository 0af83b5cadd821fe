// Naming strategy - derives table and column names from model names

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Config;

static ACRONYM_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("valid acronym pattern"));
static WORD_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid word pattern"));

/// Table and column naming rules applied by the schema registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingStrategy {
    pub table_prefix: String,
    pub singular_table: bool,
}

impl NamingStrategy {
    pub fn new(table_prefix: &str, singular_table: bool) -> Self {
        Self {
            table_prefix: table_prefix.to_string(),
            singular_table,
        }
    }

    /// `OrderItem` -> `order_items`, or `order_item` with singular tables.
    pub fn table_name(&self, model: &str) -> String {
        let snake = to_snake_case(model);
        if self.singular_table {
            format!("{}{}", self.table_prefix, snake)
        } else {
            format!("{}{}", self.table_prefix, pluralize(&snake))
        }
    }

    pub fn column_name(&self, field: &str) -> String {
        to_snake_case(field)
    }

    /// Join tables keep the name they were declared with; only the prefix applies.
    pub fn join_table_name(&self, name: &str) -> String {
        format!("{}{}", self.table_prefix, to_snake_case(name))
    }

    pub fn foreign_key(&self, name: &str) -> String {
        format!("{}_id", to_snake_case(name))
    }
}

impl From<&Config> for NamingStrategy {
    fn from(config: &Config) -> Self {
        Self::new(&config.table_prefix, config.singular_table)
    }
}

pub fn to_snake_case(name: &str) -> String {
    let name = name.trim().replace([' ', '-'], "_");
    let split = ACRONYM_BOUNDARY.replace_all(&name, "${1}_${2}");
    let split = WORD_BOUNDARY.replace_all(&split, "${1}_${2}");
    split.to_lowercase()
}

/// English pluralization for snake_case table names.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    if ["s", "sh", "ch", "x", "z"].iter().any(|suffix| word.ends_with(suffix)) {
        return format!("{}es", word);
    }

    if let Some(stem) = word.strip_suffix('y') {
        let before = stem.chars().last();
        if before.is_some_and(|c| !"aeiou".contains(c)) {
            return format!("{}ies", stem);
        }
    }

    format!("{}s", word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(to_snake_case("User"), "user");
        assert_eq!(to_snake_case("OrderItem"), "order_item");
        assert_eq!(to_snake_case("HTTPRequest"), "http_request");
        assert_eq!(to_snake_case("createdAt"), "created_at");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("user"), "users");
        assert_eq!(pluralize("address"), "addresses");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("box"), "boxes");
    }

    #[test]
    fn test_table_names() {
        let naming = NamingStrategy::new("t_amz_", false);
        assert_eq!(naming.table_name("OrderItem"), "t_amz_order_items");

        let singular = NamingStrategy::new("t_amz_", true);
        assert_eq!(singular.table_name("OrderItem"), "t_amz_order_item");
        assert_eq!(singular.join_table_name("enrollments"), "t_amz_enrollments");
        assert_eq!(singular.foreign_key("customer"), "customer_id");
    }

    #[test]
    fn test_from_config() {
        let config = Config::default().with_table_prefix("t_").with_singular_table(true);
        let naming = NamingStrategy::from(&config);
        assert_eq!(naming.table_name("User"), "t_user");
    }
}
