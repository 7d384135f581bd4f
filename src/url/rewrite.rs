use crate::sitemap::{SitemapEntry, SitemapUrls};
use crate::url::is_fqdn;
use crate::{UrlError, UrlResult};
use url::Url;

/// Schemes a rewritten URL may be switched to
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Points discovered URLs at a different host (and optionally scheme)
///
/// Used to aim a cache-warming crawl at a staging environment while reading
/// the production sitemap. Rewriting is opt-in: without a target host every
/// URL passes through unchanged.
#[derive(Debug, Clone, Default)]
pub struct UrlRewriter {
    target_host: Option<String>,
    target_scheme: Option<String>,
}

impl UrlRewriter {
    /// Creates a rewriter, validating the targets up front
    ///
    /// # Errors
    ///
    /// * `UrlError::InvalidHostname` - `target_host` is not a valid FQDN
    /// * `UrlError::InvalidScheme` - `target_scheme` is neither http nor https
    ///
    /// # Example
    ///
    /// ```
    /// use sitemap_sweep::url::UrlRewriter;
    ///
    /// assert!(UrlRewriter::new(Some("staging.example.com"), Some("http")).is_ok());
    /// assert!(UrlRewriter::new(Some("bad..host"), None).is_err());
    /// ```
    pub fn new(target_host: Option<&str>, target_scheme: Option<&str>) -> UrlResult<Self> {
        if let Some(host) = target_host {
            if !is_fqdn(host) {
                return Err(UrlError::InvalidHostname(host.to_string()));
            }
        }

        let target_scheme = match target_scheme {
            Some(scheme) => {
                let lowered = scheme.to_ascii_lowercase();
                if !ALLOWED_SCHEMES.contains(&lowered.as_str()) {
                    return Err(UrlError::InvalidScheme(scheme.to_string()));
                }
                Some(lowered)
            }
            None => None,
        };

        if target_host.is_none() && target_scheme.is_some() {
            tracing::warn!("A target scheme without a target host is ignored");
        }

        Ok(Self {
            target_host: target_host.map(str::to_string),
            target_scheme,
        })
    }

    /// Returns true if this rewriter changes anything
    pub fn is_active(&self) -> bool {
        self.target_host.is_some()
    }

    /// Rewrites every URL of a discovery result
    ///
    /// Last-modified markers follow their URL. If two URLs collapse onto the
    /// same rewritten URL, the later one wins.
    pub fn rewrite(&self, urls: SitemapUrls) -> SitemapUrls {
        if !self.is_active() {
            return urls;
        }

        let mut rewritten = SitemapUrls::new();
        for entry in urls {
            let url = self.rewrite_url(&entry.url);
            rewritten.insert_overwrite(SitemapEntry {
                url,
                last_modified: entry.last_modified,
            });
        }
        rewritten
    }

    /// Rewrites a single URL
    ///
    /// The whole network location is replaced, so any port or credentials of
    /// the original URL are dropped. Path, query and fragment are kept.
    /// URLs that cannot be parsed or cannot carry a host come back unchanged.
    pub fn rewrite_url(&self, original: &str) -> String {
        let Some(host) = self.target_host.as_deref() else {
            return original.to_string();
        };

        match self.try_rewrite(original, host) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::warn!("Keeping {} unchanged: {}", original, e);
                original.to_string()
            }
        }
    }

    fn try_rewrite(&self, original: &str, host: &str) -> UrlResult<Url> {
        let mut url = Url::parse(original).map_err(|e| UrlError::Parse(e.to_string()))?;

        if url.cannot_be_a_base() {
            return Err(UrlError::Parse(format!("{} has no host", original)));
        }

        if let Some(scheme) = &self.target_scheme {
            url.set_scheme(scheme)
                .map_err(|_| UrlError::InvalidScheme(scheme.clone()))?;
        }

        url.set_host(Some(host))
            .map_err(|e| UrlError::Parse(e.to_string()))?;
        let _ = url.set_port(None);
        let _ = url.set_username("");
        let _ = url.set_password(None);

        Ok(url)
    }
}

/// Validates the targets and rewrites a discovery result in one step
///
/// # Example
///
/// ```
/// use sitemap_sweep::sitemap::{SitemapEntry, SitemapUrls};
/// use sitemap_sweep::url::rewrite_urls;
///
/// let urls: SitemapUrls = vec![SitemapEntry::new(
///     "http://www.example.com/a?b=1#c",
///     Some("2020-01-01".to_string()),
/// )]
/// .into_iter()
/// .collect();
///
/// let rewritten = rewrite_urls(urls, Some("example.com"), Some("https")).unwrap();
/// assert_eq!(rewritten.get("https://example.com/a?b=1#c"), Some("2020-01-01"));
/// ```
pub fn rewrite_urls(
    urls: SitemapUrls,
    target_host: Option<&str>,
    target_scheme: Option<&str>,
) -> UrlResult<SitemapUrls> {
    let rewriter = UrlRewriter::new(target_host, target_scheme)?;
    Ok(rewriter.rewrite(urls))
}
