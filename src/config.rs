use serde::{Deserialize, Serialize};
use std::env;

/// Run configuration for a reorder pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Pull in dependencies the caller did not list.
    pub auto_add: bool,
    /// Prepended to every derived table name, e.g. `t_` turns `User` into `t_users`.
    pub table_prefix: String,
    /// Skip pluralization, so `User` maps to `user` instead of `users`.
    pub singular_table: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            auto_add: parse_flag(env::var("REORDER_AUTO_ADD").ok().as_deref())?,
            table_prefix: env::var("REORDER_TABLE_PREFIX").unwrap_or_default(),
            singular_table: parse_flag(env::var("REORDER_SINGULAR_TABLE").ok().as_deref())?,
        })
    }

    pub fn with_auto_add(mut self, auto_add: bool) -> Self {
        self.auto_add = auto_add;
        self
    }

    pub fn with_table_prefix(mut self, prefix: &str) -> Self {
        self.table_prefix = prefix.to_string();
        self
    }

    pub fn with_singular_table(mut self, singular: bool) -> Self {
        self.singular_table = singular;
        self
    }
}

fn parse_flag(value: Option<&str>) -> anyhow::Result<bool> {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "" | "0" | "false" | "no" | "off" => Ok(false),
            "1" | "true" | "yes" | "on" => Ok(true),
            other => anyhow::bail!("invalid boolean value '{}'", other),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(!parse_flag(None).unwrap());
        assert!(parse_flag(Some("TRUE")).unwrap());
        assert!(parse_flag(Some(" 1 ")).unwrap());
        assert!(!parse_flag(Some("off")).unwrap());
        assert!(parse_flag(Some("maybe")).is_err());
    }

    #[test]
    fn test_builder_methods() {
        let config = Config::default()
            .with_auto_add(true)
            .with_table_prefix("t_")
            .with_singular_table(true);

        assert!(config.auto_add);
        assert_eq!(config.table_prefix, "t_");
        assert!(config.singular_table);
    }
}
