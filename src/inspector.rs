//! Registry inspection
//!
//! The checker never talks to a registry itself. An [`Inspector`] returns the
//! image configuration document for a reference and [`image_version`] pulls
//! the OCI version label out of it. [`SkopeoInspector`] shells out to
//! `skopeo inspect --config` with an explicit timeout and no retries.

use crate::error::{Result, VersionError};
use crate::reference::ImageReference;
use crate::types::{InspectDocument, Settings};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

pub const VERSION_LABEL: &str = "org.opencontainers.image.version";

#[async_trait]
pub trait Inspector {
    async fn inspect(&self, reference: &ImageReference) -> Result<InspectDocument>;
}

#[derive(Debug, Clone)]
pub struct SkopeoInspector {
    program: String,
    timeout: Duration,
    verbose: bool,
}

impl SkopeoInspector {
    pub fn new(program: impl Into<String>, timeout: Duration, verbose: bool) -> Self {
        SkopeoInspector {
            program: program.into(),
            timeout,
            verbose,
        }
    }

    pub fn from_settings(settings: &Settings, verbose: bool) -> Self {
        Self::new(
            settings.skopeo_path.clone(),
            Duration::from_secs(settings.inspect_timeout_secs),
            verbose,
        )
    }

    fn args(reference: &ImageReference) -> [String; 3] {
        [
            "inspect".to_string(),
            "--config".to_string(),
            format!("docker://{}", reference),
        ]
    }
}

#[async_trait]
impl Inspector for SkopeoInspector {
    async fn inspect(&self, reference: &ImageReference) -> Result<InspectDocument> {
        let target = reference.to_string();
        let args = Self::args(reference);
        tracing::debug!("Executing: {} {:?}", self.program, args);

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(if self.verbose {
                Stdio::inherit()
            } else {
                Stdio::null()
            })
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    VersionError::inspector_failure(
                        &target,
                        format!(
                            "{} needs to be installed. Refer to \
                             https://github.com/containers/skopeo/blob/main/install.md \
                             for more information",
                            self.program
                        ),
                    )
                } else {
                    VersionError::inspector_failure(&target, e.to_string())
                }
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                VersionError::inspector_failure(
                    &target,
                    format!("{} timed out after {:?}", self.program, self.timeout),
                )
            })?
            .map_err(|e| VersionError::inspector_failure(&target, e.to_string()))?;

        if !output.status.success() {
            return Err(VersionError::inspector_failure(
                &target,
                format!("{} exited with {}", self.program, output.status),
            ));
        }

        parse_document(&target, &output.stdout)
    }
}

/// Decode inspector output. Empty documents (`null`, `{}`, `""`) are failures.
pub fn parse_document(target: &str, raw: &[u8]) -> Result<InspectDocument> {
    let value: serde_json::Value = serde_json::from_slice(raw)
        .map_err(|e| VersionError::inspector_failure(target, e.to_string()))?;

    let empty = match &value {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        serde_json::Value::String(s) => s.is_empty(),
        _ => false,
    };
    if empty {
        return Err(VersionError::inspector_failure(target, "empty document"));
    }

    serde_json::from_value(value).map_err(|e| VersionError::inspector_failure(target, e.to_string()))
}

/// The version label of `reference` as reported by `inspector`.
pub async fn image_version<I>(inspector: &I, reference: &ImageReference) -> Result<String>
where
    I: Inspector + ?Sized + Sync,
{
    tracing::info!(
        "Inspecting {} tagged with {} on {}",
        reference.image,
        reference.tag,
        reference.registry
    );

    let document = inspector.inspect(reference).await?;
    let version = document
        .config
        .and_then(|config| config.labels)
        .and_then(|mut labels| labels.remove(VERSION_LABEL))
        .ok_or_else(|| VersionError::MissingVersionLabel {
            reference: reference.to_string(),
        })?;

    tracing::info!(
        "The latest version of {} for {} is {}",
        reference.tag,
        reference.image,
        version
    );
    Ok(version)
}
