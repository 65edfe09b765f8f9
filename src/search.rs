//! "Find a place to eat": a map search for a random restaurant on the list.
//!
//! Reads the list but never changes it.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{Item, ListModel};

/// Default map search endpoint. The query is appended as a path segment.
pub const DEFAULT_MAP_SEARCH_URL: &str = "https://www.google.com/maps/search/";

/// Query used when the list is empty.
pub const FALLBACK_QUERY: &str = "food";

/// Appended to every restaurant query.
const QUERY_SUFFIX: &str = "restaurant";

/// Characters left as-is inside a query word (RFC 3986 unreserved).
const WORD: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Something that can hand a URL to the outside world.
pub trait UrlOpener {
    fn open_url(&self, url: &str) -> std::io::Result<()>;
}

/// Opens URLs with the platform's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open_url(&self, url: &str) -> std::io::Result<()> {
        tracing::debug!(url, "Opening URL");
        open::that(url)
    }
}

/// Builds map search URLs.
#[derive(Debug, Clone)]
pub struct MapSearch {
    base_url: String,
}

impl MapSearch {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL for `label`, or the generic fallback when there is none.
    ///
    /// Words of the label are joined with `+` and followed by `+restaurant`.
    pub fn url_for(&self, label: Option<&str>) -> String {
        let words: Vec<String> = label
            .into_iter()
            .flat_map(str::split_whitespace)
            .map(|w| utf8_percent_encode(w, WORD).to_string())
            .collect();

        if words.is_empty() {
            return format!("{}{}", self.base_url, FALLBACK_QUERY);
        }
        format!("{}{}+{}", self.base_url, words.join("+"), QUERY_SUFFIX)
    }

    /// Pick an item uniformly at random.
    pub fn pick<'a, R: Rng + ?Sized>(&self, model: &'a ListModel, rng: &mut R) -> Option<&'a Item> {
        model.items().choose(rng)
    }

    /// URL for a random item, or the fallback for an empty list.
    pub fn random_url<R: Rng + ?Sized>(&self, model: &ListModel, rng: &mut R) -> String {
        let picked = self.pick(model, rng);
        self.url_for(picked.map(|i| i.short_disc.as_str()))
    }
}

impl Default for MapSearch {
    fn default() -> Self {
        Self::new(DEFAULT_MAP_SEARCH_URL)
    }
}
