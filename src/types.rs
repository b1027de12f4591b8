use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A rule declared in the settings file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomRule {
    pub name: String,
    pub pattern: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_skopeo_path")]
    pub skopeo_path: String,
    #[serde(default = "default_inspect_timeout_secs")]
    pub inspect_timeout_secs: u64,
    #[serde(default = "default_rule")]
    pub default_rule: String,
    #[serde(default = "default_tag")]
    pub default_tag: String,
    #[serde(default)]
    pub rules: Vec<CustomRule>,
}

fn default_skopeo_path() -> String {
    "skopeo".to_string()
}
fn default_inspect_timeout_secs() -> u64 {
    30
}
fn default_rule() -> String {
    "default".to_string()
}
fn default_tag() -> String {
    "latest".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            skopeo_path: default_skopeo_path(),
            inspect_timeout_secs: default_inspect_timeout_secs(),
            default_rule: default_rule(),
            default_tag: default_tag(),
            rules: Vec::new(),
        }
    }
}

/// The parts of `skopeo inspect --config` output the checker reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InspectDocument {
    #[serde(default)]
    pub config: Option<ImageConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageConfig {
    #[serde(rename = "Labels", default)]
    pub labels: Option<HashMap<String, String>>,
}
