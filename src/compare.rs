use crate::error::{Result, VersionError};
use crate::parser::{parse_version, Components};
use crate::rules::RuleSet;
use semver::Version;
use std::cmp::Ordering;

/// Strip leading zeros from a purely numeric identifier (`"06"` -> `"6"`).
fn normalize_numeric(identifier: &str) -> &str {
    if !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit()) {
        let trimmed = identifier.trim_start_matches('0');
        if trimmed.is_empty() {
            "0"
        } else {
            trimmed
        }
    } else {
        identifier
    }
}

/// Convert extracted components into a [`semver::Version`].
pub fn to_semver(components: &Components) -> Result<Version> {
    let mut text = format!(
        "{}.{}.{}",
        normalize_numeric(&components.major),
        normalize_numeric(&components.minor),
        normalize_numeric(&components.patch)
    );
    if let Some(pre) = &components.prerelease {
        let pre: Vec<&str> = pre.split('.').map(normalize_numeric).collect();
        text.push('-');
        text.push_str(&pre.join("."));
    }
    if let Some(build) = &components.build {
        text.push('+');
        text.push_str(build);
    }

    Version::parse(&text).map_err(|source| VersionError::InvalidComponent {
        version: text.clone(),
        source,
    })
}

/// SemVer precedence: build metadata is ignored.
pub fn precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// Return whichever of `source` and `target` is newer under `rule_name`.
///
/// Identical strings are returned without being parsed. Ties go to `source`.
///
/// `major`, `minor` and `patch` must fit in a `u64`; larger values fail with
/// [`VersionError::InvalidComponent`].
pub fn compare_versions<'a>(
    source: &'a str,
    target: &'a str,
    rule_name: &str,
    rules: &RuleSet,
) -> Result<&'a str> {
    compare_with(source, target, |version| {
        parse_version(version, rules, rule_name)
    })
}

pub fn compare_with<'a, F>(source: &'a str, target: &'a str, mut parse: F) -> Result<&'a str>
where
    F: FnMut(&str) -> Result<Components>,
{
    tracing::debug!("Comparing {} against {}...", source, target);

    if source == target {
        return Ok(source);
    }

    let source_version = to_semver(&parse(source)?)?;
    let target_version = to_semver(&parse(target)?)?;

    if precedence(&target_version, &source_version) == Ordering::Greater {
        Ok(target)
    } else {
        Ok(source)
    }
}
