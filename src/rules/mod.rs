//! Named version-extraction rules
//!
//! A [`Rule`] is a regex with named capture groups drawn from
//! `major`, `minor`, `patch`, `prerelease` and `build`. A [`RuleSet`] stores
//! rules under their canonical names together with an alias table, and two
//! rule sets can be merged with the right-hand side winning every conflict.

pub mod builtin;

use crate::error::{Result, VersionError};
use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Add;

/// Capture groups every rule must declare.
pub const REQUIRED_GROUPS: [&str; 3] = ["major", "minor", "patch"];

#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    pattern: String,
    regex: Regex,
}

impl Rule {
    /// Compile a rule. The pattern is anchored at both ends so that a match
    /// always consumes the whole input.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let pattern = pattern.into();

        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| {
            VersionError::InvalidPattern {
                rule: name.clone(),
                source,
            }
        })?;

        let declared: Vec<&str> = regex.capture_names().flatten().collect();
        if let Some(missing) = REQUIRED_GROUPS.iter().find(|g| !declared.contains(*g)) {
            return Err(VersionError::invalid_argument(format!(
                "rule {} does not declare the '{}' group",
                name, missing
            )));
        }

        Ok(Rule {
            name,
            pattern,
            regex,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pattern as written, without the anchoring added by [`Rule::new`].
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn declares(&self, group: &str) -> bool {
        self.regex.capture_names().flatten().any(|n| n == group)
    }

    pub fn captures<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        self.regex.captures(text)
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.pattern == other.pattern
    }
}

impl Eq for Rule {}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.pattern)
    }
}

/// A listing entry for one canonical rule.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RuleSummary {
    pub name: String,
    pub pattern: String,
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: BTreeMap<String, Rule>,
    aliases: BTreeMap<String, String>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a rule set from `(name, pattern)` pairs.
    pub fn from_patterns<'a, I>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut set = RuleSet::new();
        for (name, pattern) in patterns {
            set.insert(Rule::new(name, pattern)?);
        }
        Ok(set)
    }

    /// Store a rule under its canonical name, replacing any previous rule of that name.
    pub fn insert(&mut self, rule: Rule) -> Option<Rule> {
        self.rules.insert(rule.name.clone(), rule)
    }

    /// Register one or more aliases for `canonical`. Supplying no aliases is an error.
    pub fn add_alias<S: AsRef<str>>(&mut self, canonical: &str, aliases: &[S]) -> Result<()> {
        if aliases.is_empty() {
            return Err(VersionError::invalid_argument(format!(
                "aliases for {} are not declared",
                canonical
            )));
        }
        for alias in aliases {
            self.aliases
                .insert(alias.as_ref().to_string(), canonical.to_string());
        }
        Ok(())
    }

    pub fn with_alias<S: AsRef<str>>(mut self, canonical: &str, aliases: &[S]) -> Result<Self> {
        self.add_alias(canonical, aliases)?;
        Ok(self)
    }

    /// Map an alias to its canonical name; anything else is returned as is.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn get(&self, name: &str) -> Result<&Rule> {
        let canonical = self.resolve(name);
        tracing::trace!("Resolved rule '{}' to '{}'", name, canonical);
        self.rules
            .get(canonical)
            .ok_or_else(|| VersionError::RuleNotFound {
                rule: name.to_string(),
            })
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name) || self.aliases.contains_key(name)
    }

    /// Union of both sets. Rules and aliases from `other` win on conflict.
    pub fn merge(&self, other: &RuleSet) -> RuleSet {
        let mut merged = self.clone();
        merged
            .rules
            .extend(other.rules.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
            .aliases
            .extend(other.aliases.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Every name accepted by [`RuleSet::has_rule`], canonical names first.
    pub fn accepted_names(&self) -> Vec<&str> {
        self.rules
            .keys()
            .chain(self.aliases.keys())
            .map(String::as_str)
            .collect()
    }

    pub fn aliases_of(&self, canonical: &str) -> Vec<&str> {
        self.aliases
            .iter()
            .filter(|(_, target)| target.as_str() == canonical)
            .map(|(alias, _)| alias.as_str())
            .collect()
    }

    pub fn summaries(&self) -> Vec<RuleSummary> {
        self.rules
            .values()
            .map(|rule| RuleSummary {
                name: rule.name.clone(),
                pattern: rule.pattern.clone(),
                aliases: self
                    .aliases_of(&rule.name)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Add<&RuleSet> for &RuleSet {
    type Output = RuleSet;

    fn add(self, other: &RuleSet) -> RuleSet {
        self.merge(other)
    }
}

impl Add for RuleSet {
    type Output = RuleSet;

    fn add(self, other: RuleSet) -> RuleSet {
        self.merge(&other)
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.rule_names().collect();
        write!(f, "RuleSet[{}]", names.join(" "))
    }
}
