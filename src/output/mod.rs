mod exports;
mod progress;
mod styling;
mod summary;
mod tables;

pub use progress::ListingProgress;
pub use styling::{dim, magenta_bold};
pub use summary::Reporter;

/// Prints the banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🧹 pipeline-dedup"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Stops superseded Bitbucket pipelines")
    );
}
