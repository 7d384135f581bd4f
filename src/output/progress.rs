//! Progress reporting
//!
//! Two explicit operations replace a single "log or spin" helper:
//! [`Progress::emit`] writes a log event at a given level, and
//! [`Progress::tick`] advances the spinner. The verbosity is a plain value
//! handed to every component at construction time.

use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Display;
use std::time::Duration;
use tracing::Level;

/// How chatty the sweep should be, from the number of `-v` flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Verbosity(u8);

impl Verbosity {
    /// Only errors
    pub const QUIET: Verbosity = Verbosity(0);

    pub fn new(verbose: u8) -> Self {
        Self(verbose.saturating_add(1))
    }

    /// Verbosity for `-q`
    pub fn quiet() -> Self {
        Self::QUIET
    }

    /// Most detailed level that is emitted
    pub fn max_level(&self) -> Level {
        match self.0 {
            0 => Level::ERROR,
            1 => Level::WARN,
            2 => Level::INFO,
            3 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Returns true if events at `level` are emitted
    pub fn enables(&self, level: Level) -> bool {
        level <= self.max_level()
    }

    /// The spinner only runs while informational logs are hidden
    pub fn shows_spinner(&self) -> bool {
        self.0 == 1
    }

    /// Filter directive for the tracing subscriber
    pub fn filter_directive(&self) -> &'static str {
        match self.0 {
            0 => "error",
            1 => "sitemap_sweep=warn,error",
            2 => "sitemap_sweep=info,warn",
            3 => "sitemap_sweep=debug,info",
            _ => "trace",
        }
    }
}

/// Log emitter plus optional spinner, shared by discovery and fetching
#[derive(Clone)]
pub struct Progress {
    verbosity: Verbosity,
    spinner: ProgressBar,
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress")
            .field("verbosity", &self.verbosity)
            .field("position", &self.spinner.position())
            .finish()
    }
}

impl Progress {
    /// Creates a progress reporter; the spinner is drawn only if the
    /// verbosity calls for it
    pub fn new(verbosity: Verbosity) -> Self {
        let spinner = if verbosity.shows_spinner() {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        } else {
            ProgressBar::hidden()
        };

        Self { verbosity, spinner }
    }

    /// A reporter that draws nothing and logs only what tracing lets through
    pub fn hidden() -> Self {
        Self {
            verbosity: Verbosity::default(),
            spinner: ProgressBar::hidden(),
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Writes a log event if the verbosity allows it
    pub fn emit(&self, level: Level, message: impl Display) {
        if !self.verbosity.enables(level) {
            return;
        }

        self.spinner.suspend(|| match level {
            Level::ERROR => tracing::error!("{}", message),
            Level::WARN => tracing::warn!("{}", message),
            Level::INFO => tracing::info!("{}", message),
            Level::DEBUG => tracing::debug!("{}", message),
            _ => tracing::trace!("{}", message),
        });
    }

    /// Advances the spinner by one unit of work
    pub fn tick(&self) {
        self.spinner.inc(1);
    }

    /// Number of ticks so far
    pub fn position(&self) -> u64 {
        self.spinner.position()
    }

    /// Updates the spinner caption
    pub fn set_message(&self, message: impl Into<String>) {
        self.spinner.set_message(message.into());
    }

    /// Stops and clears the spinner
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::hidden()
    }
}
