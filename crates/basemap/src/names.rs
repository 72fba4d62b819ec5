//! Name attributes for output features.

use crate::feature::{OutputFeature, SourceFeature};

/// Adds name attributes to a feature from its source tags.
///
/// Implementations must leave the feature untouched when the source carries
/// no name tags.
pub trait NameResolver: Send + Sync {
    /// `min_zoom` is the zoom from which the name attributes are encoded
    fn add_names(&self, feature: &mut OutputFeature, source: &SourceFeature, min_zoom: u8);
}

/// Copies `name` and `name:<lang>` tags verbatim.
///
/// With a language allow-list only the listed `name:<lang>` variants are
/// kept; the plain `name` tag is always copied.
#[derive(Clone, Debug, Default)]
pub struct OsmNames {
    languages: Option<Vec<String>>,
}

impl OsmNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_languages<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            languages: Some(languages.into_iter().map(Into::into).collect()),
        }
    }

    fn keeps_language(&self, lang: &str) -> bool {
        match &self.languages {
            Some(allowed) => allowed.iter().any(|l| l == lang),
            None => !lang.is_empty(),
        }
    }
}

impl NameResolver for OsmNames {
    fn add_names(&self, feature: &mut OutputFeature, source: &SourceFeature, min_zoom: u8) {
        for (key, value) in source.tags() {
            if value.is_empty() {
                continue;
            }
            let keep = match key.strip_prefix("name:") {
                Some(lang) => self.keeps_language(lang),
                None => key == "name",
            };
            if keep {
                feature.set_attr_with_min_zoom(key.as_str(), value.as_str(), min_zoom);
            }
        }
    }
}

/// Resolver that never adds names
#[derive(Clone, Copy, Debug, Default)]
pub struct NoNames;

impl NameResolver for NoNames {
    fn add_names(&self, _feature: &mut OutputFeature, _source: &SourceFeature, _min_zoom: u8) {}
}
