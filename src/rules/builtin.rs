//! Rule libraries shipped with the checker
//!
//! | rule       | aliases                        | example tag          |
//! |------------|--------------------------------|----------------------|
//! | `default`  | `docker.io`, `docker`          | `v2.11.0`            |
//! | `lscr`     | `lscr.io`, `linuxserver`, `lxs`| `version-1.2.3-ls789` |
//! | `yymmdd`   | `YYMMDD`                       | `nightly-240601`     |
//! | `yyyymmdd` | `YYYYMMDD`                     | `20240601`           |

use super::{Rule, RuleSet};
use std::sync::OnceLock;

pub const DEFAULT_RULE: &str = "default";
pub const LSCR_RULE: &str = "lscr";
pub const YYMMDD_RULE: &str = "yymmdd";
pub const YYYYMMDD_RULE: &str = "yyyymmdd";

/// Optional `v` or `version-` prefix, `MAJOR.MINOR.PATCH`, then anything.
pub const DEFAULT_PATTERN: &str = r"(?:v|version-)?(?P<major>[0-9]+)\.(?P<minor>[0-9]+)\.(?P<patch>[0-9]+).*";

/// Linuxserver tags: `[v|version-]MAJOR.MINOR.PATCH[.PRERELEASE][-lsBUILD]`.
pub const LSCR_PATTERN: &str = r"(?:v|version-)?(?P<major>[0-9]+)\.(?P<minor>[0-9]+)\.(?P<patch>[0-9]+)(?:\.(?P<prerelease>[0-9]+))?(?:-ls(?P<build>[0-9]+))?";

pub const YYMMDD_PATTERN: &str = r".*(?P<major>[0-9]{2})(?P<minor>[0-9]{2})(?P<patch>[0-9]{2})";

pub const YYYYMMDD_PATTERN: &str = r".*(?P<major>[0-9]{4})(?P<minor>[0-9]{2})(?P<patch>[0-9]{2})";

fn builtin(name: &str, pattern: &str, aliases: &[&str]) -> RuleSet {
    let mut set = RuleSet::new();
    set.insert(Rule::new(name, pattern).expect("built-in pattern compiles"));
    set.add_alias(name, aliases)
        .expect("built-in rules declare aliases");
    set
}

pub fn default_rules() -> RuleSet {
    builtin(DEFAULT_RULE, DEFAULT_PATTERN, &["docker.io", "docker"])
}

pub fn lscr_rules() -> RuleSet {
    builtin(LSCR_RULE, LSCR_PATTERN, &["lscr.io", "linuxserver", "lxs"])
}

pub fn yymmdd_rules() -> RuleSet {
    builtin(YYMMDD_RULE, YYMMDD_PATTERN, &["YYMMDD"])
}

pub fn yyyymmdd_rules() -> RuleSet {
    builtin(YYYYMMDD_RULE, YYYYMMDD_PATTERN, &["YYYYMMDD"])
}

/// All built-in libraries merged in order; later libraries win on name collisions.
pub fn general_rules() -> &'static RuleSet {
    static GENERAL: OnceLock<RuleSet> = OnceLock::new();
    GENERAL.get_or_init(|| default_rules() + lscr_rules() + yymmdd_rules() + yyyymmdd_rules())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_rules_contents() {
        let rules = general_rules();
        assert_eq!(
            rules.rule_names().collect::<Vec<_>>(),
            vec!["default", "lscr", "yymmdd", "yyyymmdd"]
        );
        for alias in [
            "docker.io",
            "docker",
            "lscr.io",
            "linuxserver",
            "lxs",
            "YYMMDD",
            "YYYYMMDD",
        ] {
            assert!(rules.has_rule(alias), "missing alias {}", alias);
        }
    }

    #[test]
    fn test_aliases_share_pattern() {
        let rules = general_rules();
        for (canonical, alias) in [
            ("default", "docker"),
            ("lscr", "linuxserver"),
            ("yymmdd", "YYMMDD"),
            ("yyyymmdd", "YYYYMMDD"),
        ] {
            assert_eq!(
                rules.get(canonical).unwrap().pattern(),
                rules.get(alias).unwrap().pattern()
            );
        }
    }

    #[test]
    fn test_lscr_declares_optional_groups() {
        let lscr = lscr_rules();
        let rule = lscr.get("lxs").unwrap();
        assert!(rule.declares("prerelease"));
        assert!(rule.declares("build"));
        assert!(!default_rules().get("docker").unwrap().declares("build"));
    }

    #[test]
    fn test_date_rules_are_suffix_anchored() {
        let rules = general_rules();
        let caps = rules.get("yymmdd").unwrap().captures("nightly-240601").unwrap();
        assert_eq!(&caps["major"], "24");
        assert!(rules.get("yyyymmdd").unwrap().captures("2024061").is_none());
        assert!(rules.get("yymmdd").unwrap().captures("240601-rc").is_none());
    }

    #[test]
    fn test_patterns_accept_ascii_digits_only() {
        let rules = general_rules();
        for (rule, tag) in [
            ("default", "v\u{0661}.2.4"),
            ("lscr", "1.2.\u{0663}-ls1"),
            ("yymmdd", "24060\u{0661}"),
            ("yyyymmdd", "\u{0662}0240601"),
        ] {
            assert!(
                rules.get(rule).unwrap().captures(tag).is_none(),
                "{} matched {}",
                rule,
                tag
            );
        }
    }
}
