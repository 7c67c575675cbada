//! Rule table loading
//!
//! Rules are static for the lifetime of the process. Missing sections and
//! fields fall back to the built-in tables.

use std::path::Path;

use config::{Config, File, FileFormat};
use rankbot_core::GameRules;

use super::ConfigError;

/// Supported rule document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesFormat {
    Toml,
    Json,
}

impl From<RulesFormat> for FileFormat {
    fn from(format: RulesFormat) -> Self {
        match format {
            RulesFormat::Toml => Self::Toml,
            RulesFormat::Json => Self::Json,
        }
    }
}

/// Load rules from `path`, or the built-in defaults when no file is configured
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or if the
/// resulting tables are inconsistent
pub fn load_rules(path: Option<&Path>) -> Result<GameRules, ConfigError> {
    let Some(path) = path else {
        return Ok(GameRules::default());
    };

    let rules = Config::builder()
        .add_source(File::from(path).required(true))
        .build()
        .and_then(|c| c.try_deserialize::<GameRules>())
        .map_err(|e| ConfigError::Rules(format!("{}: {e}", path.display())))?;

    checked(rules)
}

/// Parse rules from an in-memory document
///
/// # Errors
/// Returns an error if the document does not parse or the tables are inconsistent
pub fn parse_rules(content: &str, format: RulesFormat) -> Result<GameRules, ConfigError> {
    let rules = Config::builder()
        .add_source(File::from_str(content, FileFormat::from(format)))
        .build()
        .and_then(|c| c.try_deserialize::<GameRules>())
        .map_err(|e| ConfigError::Rules(e.to_string()))?;

    checked(rules)
}

fn checked(rules: GameRules) -> Result<GameRules, ConfigError> {
    rules
        .validate()
        .map_err(|e| ConfigError::Rules(e.to_string()))?;
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_file_means_defaults() {
        let rules = load_rules(None).unwrap();
        assert_eq!(rules, GameRules::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load_rules(Some(Path::new("/nonexistent/rules.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Rules(_)));
    }

    #[test]
    fn test_toml_overrides_one_section() {
        let doc = r#"
            [experience]
            message_xp = 3
            allow_self_reaction = true

            [moderation]
            warns_before_ban = 5
        "#;
        let rules = parse_rules(doc, RulesFormat::Toml).unwrap();
        assert_eq!(rules.experience.message_xp, 3);
        assert!(rules.experience.allow_self_reaction);
        assert_eq!(rules.moderation.warns_before_ban, 5);
        assert_eq!(rules.moderation.auto_ban_duration_secs, 86_400);
        assert_eq!(rules.ranks.max_level(), 10);
    }

    #[test]
    fn test_json_reaction_table() {
        let doc = r#"{
            "reactions": [
                {"kind": "star", "emoji": "⭐", "xp": 2, "daily_limit": 4, "cooldown_secs": 0, "min_rank": 1}
            ]
        }"#;
        let rules = parse_rules(doc, RulesFormat::Json).unwrap();
        assert_eq!(rules.reactions.kinds().collect::<Vec<_>>(), ["star"]);
    }

    #[test]
    fn test_unbounded_sticker_window_rejected() {
        let doc = r#"
            [moderation]
            sticker_window_secs = 10000000000000
        "#;
        let err = parse_rules(doc, RulesFormat::Toml).unwrap_err();
        assert!(err.to_string().contains("sticker_window_secs"));
    }

    #[test]
    fn test_inconsistent_rules_rejected() {
        let doc = r#"
            [[ranks]]
            level = 1
            name = "Only"
            xp_required = 0

            [[reactions]]
            kind = "heart"
            xp = 1
            daily_limit = 1
            min_rank = 2
        "#;
        let err = parse_rules(doc, RulesFormat::Toml).unwrap_err();
        assert!(err.to_string().contains("heart"));
    }
}
