use crate::error::{Result, VersionError};
use crate::rules::builtin::DEFAULT_RULE;
use crate::rules::{Rule, RuleSet};
use regex::Captures;
use serde::Serialize;
use std::fmt;

/// Value given to an optional group the rule declares but the tag did not fill.
pub const MISSING_COMPONENT: &str = "0";

/// Version components extracted from a tag.
///
/// `prerelease` and `build` are `None` when the matching rule does not declare
/// the group at all, and `Some("0")` when it declares the group but the tag
/// leaves it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Components {
    pub major: String,
    pub minor: String,
    pub patch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,
}

impl Components {
    pub fn new(major: &str, minor: &str, patch: &str) -> Self {
        Components {
            major: major.to_string(),
            minor: minor.to_string(),
            patch: patch.to_string(),
            prerelease: None,
            build: None,
        }
    }

    fn from_captures(rule: &Rule, caps: &Captures<'_>) -> Self {
        let group = |name: &str| {
            caps.name(name)
                .map(|m| m.as_str())
                .unwrap_or(MISSING_COMPONENT)
                .to_string()
        };
        let optional = |name: &str| rule.declares(name).then(|| group(name));

        Components {
            major: group("major"),
            minor: group("minor"),
            patch: group("patch"),
            prerelease: optional("prerelease"),
            build: optional("build"),
        }
    }
}

impl fmt::Display for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

/// Parse `version` with the rule named `rule_name`.
///
/// When the rule does not match, parsing is retried once with the `default`
/// rule. A failing `default` rule is never retried.
pub fn parse_version(version: &str, rules: &RuleSet, rule_name: &str) -> Result<Components> {
    if !rules.has_rule(rule_name) {
        return Err(VersionError::RuleNotFound {
            rule: rule_name.to_string(),
        });
    }

    let rule = rules.get(rule_name)?;
    if let Some(caps) = rule.captures(version) {
        tracing::debug!("Parsed '{}' with rule {}", version, rule.name());
        return Ok(Components::from_captures(rule, &caps));
    }

    if rule_name != DEFAULT_RULE && rules.resolve(rule_name) != DEFAULT_RULE {
        tracing::debug!(
            "Rule {} does not match '{}', falling back to {}",
            rule_name,
            version,
            DEFAULT_RULE
        );
        return parse_version(version, rules, DEFAULT_RULE);
    }

    Err(VersionError::UnparsableVersion {
        rule: rule_name.to_string(),
        version: version.to_string(),
    })
}
