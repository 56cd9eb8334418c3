//! Demo: explicit text identifiers and event observation
//!
//! What it demonstrates
//! - Wiring a `LineLabeler` with custom text identifiers instead of the
//!   legend captions.
//! - Subscribing to label lifecycle events via `EventController` and
//!   printing them as they happen.
//!
//! How to run
//! ```bash
//! cargo run --example named_labels
//! ```

use linelabel::{
    EventController, IdentifierSource, LabeledPlot, LabeledPlotApp, LineLabeler,
};

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let xs: Vec<f64> = (0..800).map(|i| i as f64 * 0.02).collect();
    let slow: Vec<[f64; 2]> = xs.iter().map(|&x| [x, (0.5 * x).sin()]).collect();
    let fast: Vec<[f64; 2]> = xs.iter().map(|&x| [x, (3.0 * x).sin() * 0.5]).collect();

    let mut plot = LabeledPlot::new("named_labels");
    plot.add_series("slow", slow);
    plot.add_series("fast", fast);

    let mut labeler = LineLabeler::new();
    let events = EventController::new();
    let rx = events.subscribe_all();
    labeler.set_event_controller(events);

    // Print every label event from a background thread.
    std::thread::spawn(move || {
        while let Ok(evt) = rx.recv() {
            match &evt.label {
                Some(meta) => println!(
                    "[{:8.3}s] {} '{}' at ({:.3}, {:.3})",
                    evt.timestamp, evt.kinds, meta.text, meta.position.x, meta.position.y
                ),
                None => println!("[{:8.3}s] {}", evt.timestamp, evt.kinds),
            }
        }
    });

    let source = IdentifierSource::Names(vec!["slow wave".into(), "fast wave".into()]);
    let app = LabeledPlotApp::new(plot, labeler, source);

    let opts = eframe::NativeOptions::default();
    eframe::run_native("named_labels", opts, Box::new(move |_cc| Ok(Box::new(app))))
}
