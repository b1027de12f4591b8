#[cfg(test)]
mod tests {
    use crate::compare::compare_versions;
    use crate::config;
    use crate::parser::parse_version;
    use crate::rules::builtin::{default_rules, general_rules, lscr_rules, yymmdd_rules};
    use crate::types::Settings;

    #[test]
    fn test_normalize_key() {
        assert_eq!(config::normalize_key("inspect-timeout-secs"), "inspect_timeout_secs");
        assert_eq!(config::normalize_key("defaultRule"), "default_rule");
        assert_eq!(config::normalize_key("skopeo-path"), "skopeo_path");
    }

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.skopeo_path, "skopeo");
        assert_eq!(settings.inspect_timeout_secs, 30);
        assert_eq!(settings.default_rule, "default");
        assert_eq!(settings.default_tag, "latest");
        assert!(settings.rules.is_empty());
    }

    #[test]
    fn test_settings_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"inspect_timeout_secs": 3}"#).unwrap();
        assert_eq!(settings.inspect_timeout_secs, 3);
        assert_eq!(settings.skopeo_path, "skopeo");
    }

    #[test]
    fn test_every_accepted_name_resolves() {
        let rules = general_rules();
        for name in rules.accepted_names() {
            assert!(rules.has_rule(name));
            let rule = rules.get(name).unwrap();
            assert_eq!(rules.get(rule.name()).unwrap(), rule);
        }
    }

    #[test]
    fn test_general_rules_match_manual_merge() {
        let partial = &default_rules() + &lscr_rules();
        let merged = &partial + &yymmdd_rules();
        for name in merged.accepted_names() {
            assert_eq!(merged.get(name).unwrap(), general_rules().get(name).unwrap());
        }
        assert!(!merged.has_rule("yyyymmdd"));
    }

    #[test]
    fn test_parse_then_compare_lscr_tags() {
        let rules = general_rules();
        let current = "10.11.6-r0-ls136";
        // "-r0" defeats the lscr pattern, the default rule still reads 10.11.6
        let parsed = parse_version(current, rules, "lscr").unwrap();
        assert_eq!(parsed.to_string(), "10.11.6");
        assert_eq!(
            compare_versions(current, "11.4.2", "lscr", rules).unwrap(),
            "11.4.2"
        );
    }
}
