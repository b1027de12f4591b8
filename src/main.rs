mod cli;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ConfigAction, OutputFormat};
use image_version_checker::config::{
    effective_rules, get_setting, load_settings, save_settings, set_setting, unset_setting,
    SETTING_KEYS,
};
use image_version_checker::inspector::{image_version, SkopeoInspector};
use image_version_checker::reference::UNVERSIONED_TAG;
use image_version_checker::types::Settings;
use image_version_checker::{
    compare_versions, parse_version, ImageReference, RuleSet, VersionError,
};
use serde::Serialize;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(&cli)?;

    // Load configuration
    let mut settings = load_settings()?;

    match cli.command {
        Commands::Version => {
            println!("image-version-checker {}", cli::get_version());
        }

        Commands::Check { image, tag, rule } => {
            let rules = effective_rules(&settings).context("Invalid custom rule in config")?;
            let rule = select_rule(&rules, rule, &settings)?;
            let base_tag = tag.unwrap_or_else(|| settings.default_tag.clone());

            let reference = ImageReference::split(&image, UNVERSIONED_TAG);
            let inspector = SkopeoInspector::from_settings(&settings, cli.verbose > 0);
            let newest = image_version(&inspector, &reference.with_tag(&base_tag)).await?;

            if !reference.has_version() || reference.tag == base_tag {
                println!("{}:{} is at version {}", reference.name(), base_tag, newest);
            } else if compare_versions(&reference.tag, &newest, &rule, &rules)? == reference.tag {
                println!(
                    "{}:{} is up to date (latest: {})",
                    reference.name(),
                    reference.tag,
                    newest
                );
            } else {
                println!(
                    "Update available for {}: {} -> {}",
                    reference.name(),
                    reference.tag,
                    newest
                );
            }
        }

        Commands::Split {
            image,
            default_tag,
            format,
        } => {
            let reference = ImageReference::split(&image, &default_tag);
            print_formatted(&reference, format, |r| {
                format!("registry: {}\nimage: {}\ntag: {}", r.registry, r.image, r.tag)
            })?;
        }

        Commands::Parse {
            version,
            rule,
            format,
        } => {
            let rules = effective_rules(&settings).context("Invalid custom rule in config")?;
            let rule = select_rule(&rules, rule, &settings)?;
            let components = parse_version(&version, &rules, &rule)?;
            print_formatted(&components, format, |c| {
                let mut lines = vec![
                    format!("major: {}", c.major),
                    format!("minor: {}", c.minor),
                    format!("patch: {}", c.patch),
                ];
                if let Some(pre) = &c.prerelease {
                    lines.push(format!("prerelease: {}", pre));
                }
                if let Some(build) = &c.build {
                    lines.push(format!("build: {}", build));
                }
                lines.join("\n")
            })?;
        }

        Commands::Compare {
            source,
            target,
            rule,
        } => {
            let rules = effective_rules(&settings).context("Invalid custom rule in config")?;
            let rule = select_rule(&rules, rule, &settings)?;
            println!("{}", compare_versions(&source, &target, &rule, &rules)?);
        }

        Commands::Rules { format } => {
            let rules = effective_rules(&settings).context("Invalid custom rule in config")?;
            print_formatted(&rules.summaries(), format, |summaries| {
                summaries
                    .iter()
                    .map(|s| {
                        if s.aliases.is_empty() {
                            format!("  - {}: {}", s.name, s.pattern)
                        } else {
                            format!("  - {} ({}): {}", s.name, s.aliases.join(", "), s.pattern)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }

        Commands::Config { action } => match action {
            ConfigAction::Get { key } => {
                if let Some(key) = key {
                    match get_setting(&settings, &key) {
                        Some(value) => println!("{}", value),
                        None => println!("Setting '{}' not found", key),
                    }
                } else {
                    println!("--- Image Version Checker Settings ---");
                    for key in SETTING_KEYS {
                        println!("  {}: {}", key, get_setting(&settings, key).unwrap_or_default());
                    }
                    println!("  rules: {} custom rule(s)", settings.rules.len());
                }
            }
            ConfigAction::Set { key_value } => {
                let (key, value) = key_value
                    .split_once('=')
                    .ok_or_else(|| anyhow!("Invalid format. Use 'key=value'."))?;
                set_setting(&mut settings, key, value)?;
                save_settings(&settings)?;
                tracing::info!("Setting '{}' updated to '{}'", key, value);
            }
            ConfigAction::Unset { key } => {
                unset_setting(&mut settings, &key)?;
                save_settings(&settings)?;
                tracing::info!("Setting '{}' unset", key);
            }
            ConfigAction::Show { format } => {
                print_formatted(&settings, format, |s| {
                    SETTING_KEYS
                        .iter()
                        .map(|key| format!("{}: {}", key, get_setting(s, key).unwrap_or_default()))
                        .collect::<Vec<_>>()
                        .join("\n")
                })?;
            }
        },
    }

    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if cli.quiet {
        "error"
    } else if cli.verbose == 0 {
        "warn"
    } else if cli.verbose == 1 {
        "info"
    } else {
        "debug"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    Ok(())
}

/// Pick the requested rule, or the configured default, and make sure it exists.
fn select_rule(rules: &RuleSet, requested: Option<String>, settings: &Settings) -> Result<String> {
    let rule = requested.unwrap_or_else(|| settings.default_rule.clone());
    if !rules.has_rule(&rule) {
        return Err(anyhow!(
            "{}. Valid rules: {}",
            VersionError::RuleNotFound { rule },
            rules.accepted_names().join(", ")
        ));
    }
    tracing::debug!("Using rule {}", rule);
    Ok(rule)
}

fn print_formatted<T, F>(value: &T, format: OutputFormat, plain: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
        OutputFormat::Plain => plain(value),
    };
    println!("{}", text.trim_end());
    Ok(())
}
