use crate::rules::builtin::general_rules;
use crate::rules::{Rule, RuleSet};
use crate::types::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub const APP_NAME: &str = "image-version-checker";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Keys accepted by `config get/set/unset`.
pub const SETTING_KEYS: [&str; 4] = [
    "skopeo_path",
    "inspect_timeout_secs",
    "default_rule",
    "default_tag",
];

pub fn get_config_file_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("IVC_CONFIG_PATH") {
        return Ok(PathBuf::from(path));
    }
    let path = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join(APP_NAME)
        .join(CONFIG_FILE_NAME);
    tracing::debug!("Config file path: {}", path.display());
    Ok(path)
}

pub fn load_settings() -> Result<Settings> {
    let config_path = get_config_file_path()?;

    let mut settings = if config_path.exists() {
        let content = fs::read_to_string(&config_path).with_context(|| {
            format!("Could not read config file at {}", config_path.display())
        })?;
        serde_json::from_str(&content).with_context(|| "Could not parse config file as JSON")?
    } else {
        Settings::default()
    };

    apply_env_overrides(&mut settings);
    Ok(settings)
}

fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(path) = std::env::var("IVC_SKOPEO_PATH") {
        settings.skopeo_path = path;
    }

    if let Ok(secs) = std::env::var("IVC_INSPECT_TIMEOUT_SECS") {
        match secs.parse::<u64>() {
            Ok(secs) => settings.inspect_timeout_secs = secs,
            Err(_) => tracing::warn!("Ignoring invalid IVC_INSPECT_TIMEOUT_SECS '{}'", secs),
        }
    }

    if let Ok(rule) = std::env::var("IVC_DEFAULT_RULE") {
        settings.default_rule = rule;
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let config_path = get_config_file_path()?;
    let config_dir = config_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Invalid config path"))?;

    fs::create_dir_all(config_dir)?;

    let content = serde_json::to_string_pretty(settings)?;
    fs::write(&config_path, content)?;

    Ok(())
}

/// Built-in rules merged with the custom rules from the settings file.
/// Custom rules are merged last, so they override built-ins of the same name.
pub fn effective_rules(settings: &Settings) -> crate::error::Result<RuleSet> {
    let mut custom = RuleSet::new();
    for rule in &settings.rules {
        custom.insert(Rule::new(&rule.name, &rule.pattern)?);
        if !rule.aliases.is_empty() {
            custom.add_alias(&rule.name, rule.aliases.as_slice())?;
        }
    }
    if !custom.is_empty() {
        tracing::debug!("Loaded {} custom rule(s)", custom.len());
    }
    Ok(general_rules().merge(&custom))
}

pub fn get_setting(settings: &Settings, key: &str) -> Option<String> {
    match normalize_key(key).as_str() {
        "skopeo_path" => Some(settings.skopeo_path.clone()),
        "inspect_timeout_secs" => Some(settings.inspect_timeout_secs.to_string()),
        "default_rule" => Some(settings.default_rule.clone()),
        "default_tag" => Some(settings.default_tag.clone()),
        _ => None,
    }
}

pub fn set_setting(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    let key = normalize_key(key);
    match key.as_str() {
        "skopeo_path" => settings.skopeo_path = value.to_string(),
        "inspect_timeout_secs" => {
            settings.inspect_timeout_secs = value
                .parse::<u64>()
                .with_context(|| format!("Invalid value for '{}': {}", key, value))?
        }
        "default_rule" => settings.default_rule = value.to_string(),
        "default_tag" => settings.default_tag = value.to_string(),
        _ => {
            return Err(anyhow::anyhow!(
                "'{}' is not a valid configuration setting. Valid settings: {}",
                key,
                SETTING_KEYS.join(", ")
            ))
        }
    }
    Ok(())
}

pub fn unset_setting(settings: &mut Settings, key: &str) -> Result<()> {
    let defaults = Settings::default();
    let key = normalize_key(key);
    let value = get_setting(&defaults, &key).ok_or_else(|| {
        anyhow::anyhow!(
            "'{}' is not a valid configuration setting. Valid settings: {}",
            key,
            SETTING_KEYS.join(", ")
        )
    })?;
    set_setting(settings, &key, &value)
}

pub fn normalize_key(key: &str) -> String {
    key.replace('-', "_")
        .chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                format!("_{}", c.to_lowercase())
            } else {
                c.to_string()
            }
        })
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VersionError;

    #[test]
    fn test_set_and_unset_setting() {
        let mut settings = Settings::default();
        set_setting(&mut settings, "inspect-timeout-secs", "5").unwrap();
        assert_eq!(settings.inspect_timeout_secs, 5);
        set_setting(&mut settings, "defaultRule", "lscr").unwrap();
        assert_eq!(get_setting(&settings, "default_rule").as_deref(), Some("lscr"));

        unset_setting(&mut settings, "default-rule").unwrap();
        assert_eq!(settings.default_rule, "default");
        assert!(set_setting(&mut settings, "inspect_timeout_secs", "soon").is_err());
        assert!(set_setting(&mut settings, "bogus", "1").is_err());
        assert!(unset_setting(&mut settings, "bogus").is_err());
    }

    #[test]
    fn test_custom_rules_override_builtins() {
        let settings = Settings {
            rules: vec![
                CustomRule {
                    name: "default".to_string(),
                    pattern: r"(?P<major>\d+)\.(?P<minor>\d+)\.(?P<patch>\d+)".to_string(),
                    aliases: vec![],
                },
                CustomRule {
                    name: "semver-rc".to_string(),
                    pattern: r"(?P<major>\d+)\.(?P<minor>\d+)\.(?P<patch>\d+)-rc(?P<prerelease>\d+)"
                        .to_string(),
                    aliases: vec!["rc".to_string()],
                },
            ],
            ..Settings::default()
        };

        let rules = effective_rules(&settings).unwrap();
        assert_eq!(rules.get("docker").unwrap().pattern(), settings.rules[0].pattern);
        assert!(rules.has_rule("rc"));
        assert!(rules.has_rule("lscr"));
    }

    #[test]
    fn test_custom_rule_without_core_groups() {
        let settings = Settings {
            rules: vec![CustomRule {
                name: "bad".to_string(),
                pattern: r"(?P<major>\d+)".to_string(),
                aliases: vec![],
            }],
            ..Settings::default()
        };
        assert!(matches!(
            effective_rules(&settings),
            Err(VersionError::InvalidArgument(_))
        ));
    }
}
