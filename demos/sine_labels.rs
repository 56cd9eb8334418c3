//! Demo: label sine/cosine curves from the legend
//!
//! What it demonstrates
//! - Building a `LabeledPlot` from static series and running it with
//!   `run_labeled`.
//! - Legend-derived identifiers: clicking a curve drops a label carrying
//!   its legend caption.
//!
//! How to run
//! ```bash
//! cargo run --example sine_labels
//! ```
//! Click a curve to place a label, drag a label to move it, right-click a
//! label to delete it.

use linelabel::{run_labeled, IdentifierSource};

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let n = 1000;
    let xs: Vec<f64> = (0..n).map(|i| i as f64 * 0.01).collect();
    let sine: Vec<[f64; 2]> = xs.iter().map(|&x| [x, x.sin()]).collect();
    let cosine: Vec<[f64; 2]> = xs.iter().map(|&x| [x, x.cos()]).collect();

    run_labeled(
        "sine_labels",
        vec![("sin(x)".to_string(), sine), ("cos(x)".to_string(), cosine)],
        IdentifierSource::Legend,
    )
}
