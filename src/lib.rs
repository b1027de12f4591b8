//! Extract comparable semantic versions from container image tags.
//!
//! Tags are parsed with named [`Rule`]s (`default`, `lscr`,
//! `yymmdd`, `yyyymmdd`, plus any custom ones), falling back to the `default`
//! rule once, and then ordered by SemVer precedence.

pub mod compare;
pub mod config;
pub mod error;
pub mod inspector;
pub mod parser;
pub mod reference;
pub mod rules;
pub mod types;

#[cfg(test)]
mod tests;

pub use compare::compare_versions;
pub use error::{Result, VersionError};
pub use parser::{parse_version, Components};
pub use reference::ImageReference;
pub use rules::builtin::general_rules;
pub use rules::{Rule, RuleSet};
