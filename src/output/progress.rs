use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright, bright_green, bright_red, bright_yellow};

/// Spinner shown while the pipeline listing is in flight.
///
/// Drawn on stderr; indicatif hides it when stderr is not a terminal, which is
/// the usual case inside a CI step.
pub struct ListingProgress {
    pb: ProgressBar,
}

impl ListingProgress {
    pub fn start(branch: &str) -> Self {
        eprintln!("{}  {}", bright("⚙️"), bright("Pipelines").underlined());
        let pb = create_spinner(
            bright_yellow(format!("Fetching latest pipelines for {branch}")).to_string(),
        );
        Self { pb }
    }

    pub fn finish(self, listed: usize, duplicates: usize) {
        self.pb.finish_with_message(
            bright_green(format!(
                "Fetched {listed} pipelines, {duplicates} duplicate(s) ✓"
            ))
            .to_string(),
        );
    }

    pub fn fail(self) {
        self.pb
            .abandon_with_message(bright_red("Fetching pipelines failed ✗").to_string());
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
