//! Progress bar for sheet imports.

use indicatif::{ProgressBar, ProgressStyle};

const IMPORT_TEMPLATE: &str = "{spinner:.magenta} [{bar:32.magenta/blue}] {pos}/{len} {msg}";

/// Bar over `rows` import steps. Falls back to the default style if the template is rejected.
pub fn import_bar(rows: usize) -> ProgressBar {
    let style = ProgressStyle::with_template(IMPORT_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    let bar = ProgressBar::new(rows as u64);
    bar.set_style(style);
    bar
}
