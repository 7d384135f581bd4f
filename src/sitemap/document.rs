//! Sitemap XML parsing
//!
//! Turns the body of one sitemap document into either the list of child
//! sitemaps it references (sitemap-index) or the resource entries it
//! publishes (url-set).

use crate::sitemap::entries::SitemapEntry;
use crate::ParseError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// The two shapes a sitemap document can take
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<sitemapindex>`: child sitemap URLs in document order
    Index(Vec<String>),

    /// `<urlset>`: resource entries in document order
    UrlSet(Vec<SitemapEntry>),
}

impl SitemapDocument {
    /// Number of child refs or entries in the document
    pub fn len(&self) -> usize {
        match self {
            Self::Index(refs) => refs.len(),
            Self::UrlSet(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootKind {
    Index,
    UrlSet,
}

impl RootKind {
    fn from_name(name: &str) -> Result<Self, ParseError> {
        match name {
            "sitemapindex" => Ok(Self::Index),
            "urlset" => Ok(Self::UrlSet),
            other => Err(ParseError::NotASitemap(other.to_string())),
        }
    }

    /// Name of the per-entry element under this root
    fn item_name(self) -> &'static str {
        match self {
            Self::Index => "sitemap",
            Self::UrlSet => "url",
        }
    }
}

/// Fields collected for the entry currently being read
#[derive(Debug, Default)]
struct PendingItem {
    loc: Option<String>,
    lastmod: Option<String>,
}

/// Parses a sitemap document
///
/// # Parsing Rules
///
/// - Elements are matched by local name, so namespace prefixes are ignored
/// - Only `<loc>` and `<lastmod>` that are direct children of `<url>` or
///   `<sitemap>` are read; extension elements such as `<image:loc>` nested
///   deeper are skipped
/// - Text and CDATA are accepted, entities are unescaped, surrounding
///   whitespace is trimmed
/// - An item without a `<loc>` is ignored
///
/// # Errors
///
/// * `ParseError::Malformed` - the XML itself is broken (including an empty body)
/// * `ParseError::NotASitemap` - the root is neither `<urlset>` nor `<sitemapindex>`
/// * `ParseError::Truncated` - the document ends before its root is closed
///
/// # Example
///
/// ```
/// use sitemap_sweep::sitemap::{parse_document, SitemapDocument};
///
/// let xml = r#"<sitemapindex><sitemap><loc>https://x/a.xml</loc></sitemap></sitemapindex>"#;
/// assert_eq!(
///     parse_document(xml).unwrap(),
///     SitemapDocument::Index(vec!["https://x/a.xml".to_string()])
/// );
/// ```
pub fn parse_document(xml: &str) -> Result<SitemapDocument, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut root: Option<RootKind> = None;
    let mut root_closed = false;
    let mut stack: Vec<String> = Vec::new();
    let mut pending = PendingItem::default();
    let mut text = String::new();
    let mut refs = Vec::new();
    let mut entries = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if stack.is_empty() {
                    root = Some(RootKind::from_name(&name)?);
                }
                stack.push(name);
                text.clear();
            }
            Ok(Event::Empty(e)) => {
                if stack.is_empty() {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    root = Some(RootKind::from_name(&name)?);
                    root_closed = true;
                    break;
                }
            }
            Ok(Event::Text(t)) => {
                if is_field(root, &stack) {
                    let unescaped = t
                        .unescape()
                        .map_err(|e| ParseError::Malformed(e.to_string()))?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(c)) => {
                if is_field(root, &stack) {
                    text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::End(_)) => {
                let Some(kind) = root else {
                    return Err(ParseError::Malformed("closing tag without a root".to_string()));
                };

                if is_field(root, &stack) {
                    let value = text.trim();
                    if !value.is_empty() {
                        match stack.last().map(String::as_str) {
                            Some("loc") => pending.loc = Some(value.to_string()),
                            Some("lastmod") => pending.lastmod = Some(value.to_string()),
                            _ => {}
                        }
                    }
                    text.clear();
                }

                if stack.len() == 2 && stack[1] == kind.item_name() {
                    let item = std::mem::take(&mut pending);
                    if let Some(loc) = item.loc {
                        match kind {
                            RootKind::Index => refs.push(loc),
                            RootKind::UrlSet => entries.push(SitemapEntry::new(loc, item.lastmod)),
                        }
                    }
                }

                stack.pop();
                if stack.is_empty() {
                    root_closed = true;
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Malformed(e.to_string())),
            _ => {}
        }
    }

    match root {
        None => Err(ParseError::Malformed("document has no root element".to_string())),
        Some(_) if !root_closed => Err(ParseError::Truncated),
        Some(RootKind::Index) => Ok(SitemapDocument::Index(refs)),
        Some(RootKind::UrlSet) => Ok(SitemapDocument::UrlSet(entries)),
    }
}

/// Returns true when the innermost open element is a field we collect
fn is_field(root: Option<RootKind>, stack: &[String]) -> bool {
    let Some(kind) = root else {
        return false;
    };

    if stack.len() != 3 || stack[1] != kind.item_name() {
        return false;
    }

    match kind {
        RootKind::Index => stack[2] == "loc",
        RootKind::UrlSet => stack[2] == "loc" || stack[2] == "lastmod",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urlset() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://x/1</loc>
    <lastmod>2020-01-01</lastmod>
  </url>
  <url>
    <loc>
      https://x/2
    </loc>
  </url>
</urlset>"#;

        let doc = parse_document(xml).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::UrlSet(vec![
                SitemapEntry::new("https://x/1", Some("2020-01-01".to_string())),
                SitemapEntry::new("https://x/2", None),
            ])
        );
    }

    #[test]
    fn test_parse_index_keeps_document_order() {
        let xml = r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>https://x/b.xml</loc><lastmod>2020-01-01</lastmod></sitemap>
  <sitemap><loc>https://x/a.xml</loc></sitemap>
</sitemapindex>"#;

        let doc = parse_document(xml).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::Index(vec!["https://x/b.xml".to_string(), "https://x/a.xml".to_string()])
        );
    }

    #[test]
    fn test_prefixed_names_cdata_and_entities() {
        let xml = r#"<sm:urlset xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sm:url><sm:loc><![CDATA[https://x/search?q=a&b]]></sm:loc></sm:url>
  <sm:url><sm:loc>https://x/page?a=1&amp;b=2</sm:loc></sm:url>
</sm:urlset>"#;

        let doc = parse_document(xml).unwrap();
        let SitemapDocument::UrlSet(entries) = doc else {
            panic!("expected a url-set");
        };
        assert_eq!(entries[0].url, "https://x/search?q=a&b");
        assert_eq!(entries[1].url, "https://x/page?a=1&b=2");
    }

    #[test]
    fn test_nested_extension_loc_is_ignored() {
        let xml = r#"<urlset xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
  <url>
    <loc>https://x/gallery</loc>
    <image:image><image:loc>https://x/cat.jpg</image:loc></image:image>
  </url>
  <url>
    <image:image><image:loc>https://x/dog.jpg</image:loc></image:image>
  </url>
</urlset>"#;

        let doc = parse_document(xml).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::UrlSet(vec![SitemapEntry::new("https://x/gallery", None)])
        );
    }

    #[test]
    fn test_empty_documents() {
        assert_eq!(parse_document("<urlset></urlset>").unwrap(), SitemapDocument::UrlSet(vec![]));
        assert_eq!(parse_document("<urlset/>").unwrap(), SitemapDocument::UrlSet(vec![]));
        assert!(parse_document("<sitemapindex/>").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(
            parse_document("<urlset><url><loc>https://x/1</loc></urll></urlset>"),
            Err(ParseError::Malformed(_))
        ));
        assert!(matches!(parse_document(""), Err(ParseError::Malformed(_))));
        assert_eq!(
            parse_document("<urlset><url><loc>https://x/1</loc></url>"),
            Err(ParseError::Truncated)
        );
    }

    #[test]
    fn test_html_is_not_a_sitemap() {
        let result = parse_document("<html><body>Not Found</body></html>");
        assert_eq!(result, Err(ParseError::NotASitemap("html".to_string())));
    }
}
