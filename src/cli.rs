use clap::{Parser, Subcommand, ValueEnum};

pub(crate) fn get_version() -> &'static str {
    const BASE_VERSION: &str = env!("CARGO_PKG_VERSION");

    // Release builds are tagged, use the tag as is
    if let Some(tag) = option_env!("IVC_GIT_TAG") {
        return tag;
    }

    let commit = option_env!("IVC_GIT_COMMIT").unwrap_or("unknown");
    let branch = option_env!("IVC_GIT_BRANCH").unwrap_or("unknown");

    // Leaked once at startup
    let version = format!("v{}-{} ({})", BASE_VERSION, commit, branch);
    Box::leak(version.into_boxed_str())
}

#[derive(Parser)]
#[command(name = "image-version-checker")]
#[command(about = "Check for updates to your container images' version tags")]
#[command(version = get_version(), propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (use multiple times for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce output to errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Plain,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check an image for a newer version tag
    #[command(
        after_help = "Examples:\n  image-version-checker check traefik:v2.10.7\n  image-version-checker check lscr.io/linuxserver/mariadb:10.11.6-r0-ls136 -r lscr\n  image-version-checker check ghcr.io/linuxserver/baseimage-alpine -t 3.19"
    )]
    Check {
        /// Container image, e.g. 'docker.io/alpine:3.19.1'
        image: String,
        /// The base tag to compare against, e.g. latest, develop, alpine
        #[arg(short, long)]
        tag: Option<String>,
        /// The rule (or alias) used to parse version tags
        #[arg(short, long)]
        rule: Option<String>,
    },

    /// Split an image reference into registry, image and tag
    Split {
        /// Container image, e.g. 'lscr.io/linuxserver/mariadb:10.11.6-r0-ls136'
        image: String,
        /// Tag reported when the reference carries none
        #[arg(long, default_value = "latest")]
        default_tag: String,
        #[arg(long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// Parse a version tag into its components
    Parse {
        /// Version tag, e.g. 'version-1.2.3-ls789'
        #[arg(id = "version_tag", value_name = "VERSION")]
        version: String,
        #[arg(short, long)]
        rule: Option<String>,
        #[arg(long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// Print whichever of two version tags is newer
    Compare {
        source: String,
        target: String,
        #[arg(short, long)]
        rule: Option<String>,
    },

    /// List the available rules and their aliases
    Rules {
        #[arg(long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// Manage the checker's configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show the current version
    Version,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a configuration setting
    Get {
        /// Key to get (if omitted, shows all settings)
        key: Option<String>,
    },
    /// Set a configuration setting
    Set {
        /// Key and value (e.g., 'inspect-timeout-secs=10')
        key_value: String,
    },
    /// Reset a configuration setting to its default
    Unset {
        key: String,
    },
    /// Show full configuration
    Show {
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
}
