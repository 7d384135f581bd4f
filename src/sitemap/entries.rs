//! Discovered sitemap entries and the URL → last-modified mapping

use indexmap::map::{Entry, IntoIter};
use indexmap::IndexMap;

/// Marker used when a `<url>` entry carries no `<lastmod>`
pub const UNKNOWN_LASTMOD: &str = "UNKNOWN";

/// A single resource URL published in a url-set document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    /// Value of the entry's `<loc>`
    pub url: String,

    /// Raw `<lastmod>` value, or [`UNKNOWN_LASTMOD`]
    pub last_modified: String,
}

impl SitemapEntry {
    pub fn new(url: impl Into<String>, last_modified: Option<String>) -> Self {
        Self {
            url: url.into(),
            last_modified: last_modified.unwrap_or_else(|| UNKNOWN_LASTMOD.to_string()),
        }
    }

    /// Returns true if the sitemap did not say when the resource last changed
    pub fn is_lastmod_unknown(&self) -> bool {
        self.last_modified == UNKNOWN_LASTMOD
    }
}

/// Mapping from resource URL to last-modified marker
///
/// Keys are unique. Entries keep the order in which they were first inserted,
/// so taking the first K entries of a discovery is deterministic for a
/// static sitemap tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapUrls {
    entries: IndexMap<String, String>,
}

impl SitemapUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry unless its URL is already present
    ///
    /// Returns `false` when the URL was already known; the stored
    /// last-modified value is left untouched in that case.
    pub fn insert_first_seen(&mut self, entry: SitemapEntry) -> bool {
        match self.entries.entry(entry.url) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(entry.last_modified);
                true
            }
        }
    }

    /// Inserts an entry, replacing the last-modified value of an existing URL
    ///
    /// The replaced URL keeps its original position.
    pub fn insert_overwrite(&mut self, entry: SitemapEntry) {
        self.entries.insert(entry.url, entry.last_modified);
    }

    /// Looks up the last-modified marker of a URL
    pub fn get(&self, url: &str) -> Option<&str> {
        self.entries.get(url).map(String::as_str)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(url, last_modified)` pairs in insertion order
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, String> {
        self.entries.iter()
    }

    /// Iterates URLs in insertion order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Keeps only the first `limit` entries
    pub fn truncate(&mut self, limit: usize) {
        self.entries.truncate(limit);
    }
}

impl IntoIterator for SitemapUrls {
    type Item = SitemapEntry;
    type IntoIter = std::iter::Map<IntoIter<String, String>, fn((String, String)) -> SitemapEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries
            .into_iter()
            .map(into_entry as fn((String, String)) -> SitemapEntry)
    }
}

fn into_entry((url, last_modified): (String, String)) -> SitemapEntry {
    SitemapEntry { url, last_modified }
}

impl<'a> IntoIterator for &'a SitemapUrls {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<SitemapEntry> for SitemapUrls {
    /// Collects entries with first-seen-wins semantics
    fn from_iter<I: IntoIterator<Item = SitemapEntry>>(iter: I) -> Self {
        let mut urls = Self::new();
        for entry in iter {
            urls.insert_first_seen(entry);
        }
        urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str, lastmod: &str) -> SitemapEntry {
        SitemapEntry::new(url, Some(lastmod.to_string()))
    }

    #[test]
    fn test_missing_lastmod_is_unknown() {
        let entry = SitemapEntry::new("https://x/2", None);
        assert_eq!(entry.last_modified, "UNKNOWN");
        assert!(entry.is_lastmod_unknown());
    }

    #[test]
    fn test_first_seen_wins() {
        let mut urls = SitemapUrls::new();
        assert!(urls.insert_first_seen(entry("https://x/1", "2020-01-01")));
        assert!(!urls.insert_first_seen(entry("https://x/1", "2021-06-30")));

        assert_eq!(urls.len(), 1);
        assert_eq!(urls.get("https://x/1"), Some("2020-01-01"));
    }

    #[test]
    fn test_overwrite_last_wins_and_keeps_position() {
        let mut urls = SitemapUrls::new();
        urls.insert_overwrite(entry("https://x/1", "a"));
        urls.insert_overwrite(entry("https://x/2", "b"));
        urls.insert_overwrite(entry("https://x/1", "c"));

        let collected: Vec<_> = urls.iter().map(|(url, lastmod)| (url.as_str(), lastmod.as_str())).collect();
        assert_eq!(collected, vec![("https://x/1", "c"), ("https://x/2", "b")]);
    }

    #[test]
    fn test_keys_are_exact_strings() {
        let mut urls = SitemapUrls::new();
        urls.insert_first_seen(entry("https://x/page", "a"));
        urls.insert_first_seen(entry("https://x/page/", "b"));
        urls.insert_first_seen(entry("https://x/page?q=1", "c"));
        assert_eq!(urls.len(), 3);
    }

    #[test]
    fn test_truncate_keeps_first_entries() {
        let mut urls: SitemapUrls = (1..=5)
            .map(|i| entry(&format!("https://x/{}", i), "d"))
            .collect();

        urls.truncate(2);
        assert_eq!(urls.urls().collect::<Vec<_>>(), vec!["https://x/1", "https://x/2"]);
        assert!(!urls.contains("https://x/3"));

        urls.truncate(10);
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn test_owned_iteration_yields_entries_in_order() {
        let mut urls = SitemapUrls::new();
        urls.insert_first_seen(entry("https://x/b", "1"));
        urls.insert_first_seen(SitemapEntry::new("https://x/a", None));
        urls.insert_overwrite(entry("https://x/b", "2"));

        let entries: Vec<SitemapEntry> = urls.into_iter().collect();
        assert_eq!(
            entries,
            vec![entry("https://x/b", "2"), SitemapEntry::new("https://x/a", None)]
        );
    }
}
