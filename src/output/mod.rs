//! Output module for progress and results
//!
//! This module handles:
//! - Log emission and the progress spinner shared by all crawl stages
//! - The coloured per-URL report printed after a quick crawl
//! - Screenshot capture and the snapshot pages written in screenshot mode

mod progress;
mod report;
mod screenshot;

pub use progress::{Progress, Verbosity};
pub use report::{
    format_fetch_line, format_render_line, print_fetch_report, print_render_report,
    ReportSummary,
};
pub use screenshot::{
    load_page_template, render_page, BrowserCapture, PageCapture, PageContext, RenderResult, ScreenshotRenderer,
    DEFAULT_PAGE_TEMPLATE,
};
