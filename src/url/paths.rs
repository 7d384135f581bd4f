use url::Url;

/// Name used for the page that represents a directory-like path
pub const INDEX_NAME: &str = "INDEX";

/// A resource path split into its directory and leaf name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathComponents {
    /// Directory part, always ending in `/`
    pub parent: String,

    /// Last path segment, or [`INDEX_NAME`] for directory-like paths
    pub child: String,
}

/// Splits the path of a URL into parent directory and child name
///
/// Unparsable URLs are treated as having the root path.
///
/// # Examples
///
/// ```
/// use sitemap_sweep::url::path_components;
///
/// let parts = path_components("https://example.com/blog/post");
/// assert_eq!(parts.parent, "/blog/");
/// assert_eq!(parts.child, "post");
///
/// let parts = path_components("https://example.com/blog/");
/// assert_eq!(parts.parent, "/blog/");
/// assert_eq!(parts.child, "INDEX");
/// ```
pub fn path_components(url: &str) -> PathComponents {
    let path = Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_default();
    split_path(&path)
}

/// Splits a URL path at its last `/`
pub fn split_path(path: &str) -> PathComponents {
    if path.len() <= 1 {
        return PathComponents {
            parent: "/".to_string(),
            child: INDEX_NAME.to_string(),
        };
    }

    let (parent, child) = match path.rfind('/') {
        Some(position) => (&path[..=position], &path[position + 1..]),
        None => ("/", path),
    };

    PathComponents {
        parent: parent.to_string(),
        child: if child.is_empty() {
            INDEX_NAME.to_string()
        } else {
            child.to_string()
        },
    }
}
