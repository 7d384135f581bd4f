//! Terminal report of crawl results
//!
//! One line per URL (`url : status`), coloured by status class, followed by
//! a summary of how many results fell into each class.

use crate::crawler::FetchResult;
use crate::output::RenderResult;
use colored::{ColoredString, Colorize};

/// Status classes used by the summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Responses below 300
    pub success: usize,

    /// 3xx responses
    pub redirect: usize,

    /// 4xx and 5xx responses
    pub error: usize,

    /// Requests that produced no response
    pub failed: usize,
}

impl ReportSummary {
    /// Buckets a batch of fetch results
    pub fn from_results(results: &[FetchResult]) -> Self {
        results
            .iter()
            .fold(Self::default(), |mut summary, result| {
                match result.outcome {
                    Ok(status) if status < 300 => summary.success += 1,
                    Ok(status) if status < 400 => summary.redirect += 1,
                    Ok(_) => summary.error += 1,
                    Err(_) => summary.failed += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.success + self.redirect + self.error + self.failed
    }
}

/// Colours a status code by class
fn format_status(status: u16) -> ColoredString {
    let text = status.to_string();
    if status < 300 {
        text.green()
    } else if status < 400 {
        text.yellow()
    } else {
        text.red().bold()
    }
}

/// Formats one report line
pub fn format_fetch_line(result: &FetchResult) -> String {
    match &result.outcome {
        Ok(status) => format!("{} : {}", result.url, format_status(*status)),
        Err(e) => format!(
            "{} : {}",
            result.url,
            format!("FAILED ({})", e.kind()).red().bold()
        ),
    }
}

/// Formats one screenshot report line
pub fn format_render_line(result: &RenderResult) -> String {
    match &result.outcome {
        Ok(page) => format!("{} : {}", result.url, page.display().to_string().green()),
        Err(e) => format!("{} : {}", result.url, format!("FAILED ({})", e).red().bold()),
    }
}

/// Prints the quick-mode report to stdout
pub fn print_fetch_report(results: &[FetchResult]) {
    for result in results {
        println!("{}", format_fetch_line(result));
    }

    let summary = ReportSummary::from_results(results);
    println!();
    println!("Summary:");
    println!("  {} {}", "2xx:".green(), summary.success);
    println!("  {} {}", "3xx:".yellow(), summary.redirect);
    println!("  {} {}", "4xx/5xx:".red(), summary.error);
    println!("  {} {}", "Failed:".red().bold(), summary.failed);
    println!("  Total: {}", summary.total());
}

/// Prints the screenshot-mode report to stdout
pub fn print_render_report(results: &[RenderResult]) {
    for result in results {
        println!("{}", format_render_line(result));
    }

    let failed = results.iter().filter(|r| r.outcome.is_err()).count();
    println!();
    println!(
        "Captured {} of {} page(s)",
        results.len() - failed,
        results.len()
    );
}
