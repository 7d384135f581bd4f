//! Screenshot mode
//!
//! Each discovered page is captured by a headless browser and wrapped in a
//! small HTML page. Output is laid out after the URL path:
//! `<output-dir>/<parent>/<child>.png` and `<output-dir>/<parent>/<child>.html`.
//!
//! Pages are visited one after another. A page that cannot be captured gets
//! a failed [`RenderResult`]; the remaining pages are still processed.

use crate::config::ScreenshotConfig;
use crate::output::Progress;
use crate::sitemap::SitemapUrls;
use crate::url::path_components;
use crate::SweepError;
use html_escape::encode_double_quoted_attribute;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::Level;

/// Page used when no template file is configured
pub const DEFAULT_PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{ parent }}{{ child }}</title>
</head>
<body>
  <p><a href="{{ url }}">{{ url }}</a></p>
  <p>Last modified: {{ lastmod }}, captured at {{ captured_at }}</p>
  <img src="{{ image }}" alt="{{ url }}">
</body>
</html>
"#;

/// Outcome of snapshotting one page
#[derive(Debug)]
pub struct RenderResult {
    pub url: String,

    /// Path of the written HTML page, or why it could not be produced
    pub outcome: Result<PathBuf, SweepError>,
}

/// Something that can save an image of a live page
pub trait PageCapture {
    /// Writes a screenshot of `url` to `image`
    fn capture(&self, url: &str, image: &Path) -> impl Future<Output = Result<(), SweepError>> + Send;
}

/// Captures pages by running a headless browser process
#[derive(Debug, Clone)]
pub struct BrowserCapture {
    program: String,
    window_width: u32,
}

impl BrowserCapture {
    pub fn new(program: impl Into<String>, window_width: u32) -> Self {
        Self {
            program: program.into(),
            window_width,
        }
    }

    pub fn from_config(config: &ScreenshotConfig) -> Self {
        Self::new(config.browser.clone(), config.window_width)
    }
}

impl PageCapture for BrowserCapture {
    async fn capture(&self, url: &str, image: &Path) -> Result<(), SweepError> {
        let output = Command::new(&self.program)
            .arg("--headless")
            .arg("--screenshot")
            .arg(image)
            .arg(format!("--window-size={}", self.window_width))
            .arg(url)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| SweepError::Capture {
                url: url.to_string(),
                message: format!("could not start {}: {}", self.program, e),
            })?;

        if !output.status.success() {
            return Err(SweepError::Capture {
                url: url.to_string(),
                message: format!(
                    "{} exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        if !tokio::fs::try_exists(image).await.unwrap_or(false) {
            return Err(SweepError::Capture {
                url: url.to_string(),
                message: format!("{} did not write {}", self.program, image.display()),
            });
        }

        Ok(())
    }
}

/// Values substituted into the page template
#[derive(Debug, Clone)]
pub struct PageContext<'a> {
    pub url: &'a str,
    pub lastmod: &'a str,
    pub parent: &'a str,
    pub child: &'a str,
    pub image: &'a str,
    pub captured_at: &'a str,
}

impl PageContext<'_> {
    /// Value of a template placeholder, by name
    fn value(&self, name: &str) -> Option<&str> {
        match name {
            "url" => Some(self.url),
            "lastmod" => Some(self.lastmod),
            "parent" => Some(self.parent),
            "child" => Some(self.child),
            "image" => Some(self.image),
            "captured_at" => Some(self.captured_at),
            _ => None,
        }
    }
}

/// Fills the `{{ name }}` placeholders of a page template
///
/// The template is scanned once, so placeholder text inside a substituted
/// value is never expanded. Values are HTML-escaped. Unknown placeholders
/// are left as they are.
pub fn render_page(template: &str, context: &PageContext<'_>) -> String {
    let mut page = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open + 2..].find("}}") else {
            break;
        };
        let placeholder_end = open + 2 + close + 2;
        let name = rest[open + 2..open + 2 + close].trim();

        page.push_str(&rest[..open]);
        match context.value(name) {
            Some(value) => page.push_str(&encode_double_quoted_attribute(value)),
            None => page.push_str(&rest[open..placeholder_end]),
        }
        rest = &rest[placeholder_end..];
    }

    page.push_str(rest);
    page
}

/// Reads the configured page template, or returns the built-in one
pub fn load_page_template(config: &ScreenshotConfig) -> Result<String, SweepError> {
    match &config.page_template {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => Ok(DEFAULT_PAGE_TEMPLATE.to_string()),
    }
}

/// Directory for a page, below the output root
///
/// The URL parent is always absolute, so it is re-rooted under `root`.
fn page_dir(root: &Path, parent: &str) -> PathBuf {
    parent
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .fold(root.to_path_buf(), |dir, segment| dir.join(segment))
}

/// Writes one snapshot page per URL
pub struct ScreenshotRenderer<C> {
    capture: C,
    output_dir: PathBuf,
    template: String,
    progress: Progress,
}

impl ScreenshotRenderer<BrowserCapture> {
    /// Builds a renderer driving the configured browser
    ///
    /// # Errors
    ///
    /// * `SweepError::Io` - The page template file could not be read
    pub fn from_config(config: &ScreenshotConfig, progress: Progress) -> Result<Self, SweepError> {
        Ok(Self::new(
            BrowserCapture::from_config(config),
            config.output_dir.clone(),
            load_page_template(config)?,
            progress,
        ))
    }
}

impl<C: PageCapture> ScreenshotRenderer<C> {
    pub fn new(
        capture: C,
        output_dir: impl Into<PathBuf>,
        template: impl Into<String>,
        progress: Progress,
    ) -> Self {
        Self {
            capture,
            output_dir: output_dir.into(),
            template: template.into(),
            progress,
        }
    }

    /// Snapshots every page in order and returns one result per page
    pub async fn render_all(&self, urls: &SitemapUrls) -> Vec<RenderResult> {
        self.progress.emit(
            Level::INFO,
            format_args!(
                "Capturing {} page(s) into {}",
                urls.len(),
                self.output_dir.display()
            ),
        );

        let mut results = Vec::with_capacity(urls.len());
        for (url, last_modified) in urls {
            let outcome = self.render_one(url, last_modified).await;
            if let Err(e) = &outcome {
                self.progress.emit(Level::WARN, e);
            }
            self.progress.tick();
            results.push(RenderResult {
                url: url.clone(),
                outcome,
            });
        }

        results
    }

    /// Captures one page and writes its HTML wrapper
    pub async fn render_one(&self, url: &str, last_modified: &str) -> Result<PathBuf, SweepError> {
        let parts = path_components(url);
        let dir = page_dir(&self.output_dir, &parts.parent);
        tokio::fs::create_dir_all(&dir).await?;

        let image_name = format!("{}.png", parts.child);
        let image = dir.join(&image_name);
        self.progress.emit(
            Level::DEBUG,
            format_args!("Capturing {} into {}", url, image.display()),
        );
        self.capture.capture(url, &image).await?;

        let captured_at = chrono::Utc::now().to_rfc3339();
        let page = render_page(
            &self.template,
            &PageContext {
                url,
                lastmod: last_modified,
                parent: &parts.parent,
                child: &parts.child,
                image: &image_name,
                captured_at: &captured_at,
            },
        );

        let page_path = dir.join(format!("{}.html", parts.child));
        tokio::fs::write(&page_path, page).await?;
        Ok(page_path)
    }
}
