use serde::Serialize;
use std::fmt;

pub const DEFAULT_REGISTRY: &str = "docker.io";
/// Tag used by `check` when the reference carries none, meaning "no current version".
pub const UNVERSIONED_TAG: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageReference {
    pub registry: String,
    pub image: String,
    pub tag: String,
}

impl ImageReference {
    /// Split `registry/image:tag` into its parts.
    ///
    /// This is a best-effort heuristic, not the full reference grammar:
    /// - the tag is whatever follows the first `:`, else `default_tag`
    /// - the first path segment is a registry when the path has more than one
    ///   `/` or when that segment contains a `.`; otherwise the registry is
    ///   `docker.io`
    ///
    /// ```text
    /// hello-world                                  -> docker.io, hello-world, <default_tag>
    /// lscr.io/linuxserver/mariadb:10.11.6-r0-ls136 -> lscr.io, linuxserver/mariadb, 10.11.6-r0-ls136
    /// ```
    pub fn split(reference: &str, default_tag: &str) -> Self {
        let (path, tag) = reference
            .split_once(':')
            .unwrap_or((reference, default_tag));

        let looks_like_registry = match path.split_once('/') {
            Some((first, _)) => path.matches('/').count() > 1 || first.contains('.'),
            None => false,
        };

        let (registry, image) = if looks_like_registry {
            path.split_once('/').unwrap_or((DEFAULT_REGISTRY, path))
        } else {
            (DEFAULT_REGISTRY, path)
        };

        ImageReference {
            registry: registry.to_string(),
            image: image.to_string(),
            tag: tag.to_string(),
        }
    }

    /// The same image under another tag.
    pub fn with_tag(&self, tag: &str) -> Self {
        ImageReference {
            tag: tag.to_string(),
            ..self.clone()
        }
    }

    pub fn name(&self) -> String {
        format!("{}/{}", self.registry, self.image)
    }

    pub fn has_version(&self) -> bool {
        self.tag != UNVERSIONED_TAG
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.registry, self.image, self.tag)
    }
}
