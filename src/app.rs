//! Top-level entry point for running a labeled plot as a native window.
//!
//! [`run_labeled`] is the convenience API for standalone use: it builds a
//! [`LabeledPlot`] from the given series, enables interactive labeling
//! with the chosen identifier source, and enters the eframe event loop.

use eframe::egui;

use crate::controller::LineLabeler;
use crate::plot::LabeledPlot;
use crate::resolver::IdentifierSource;

/// eframe application wrapping a [`LabeledPlot`] and its [`LineLabeler`].
pub struct LabeledPlotApp {
    plot: LabeledPlot,
    labeler: LineLabeler,
    /// Enable is deferred to the first frame so that legend resolution sees
    /// the fully built surface.
    pending_enable: Option<IdentifierSource>,
}

impl LabeledPlotApp {
    pub fn new(plot: LabeledPlot, labeler: LineLabeler, source: IdentifierSource) -> Self {
        Self {
            plot,
            labeler,
            pending_enable: Some(source),
        }
    }

    pub fn labeler(&self) -> &LineLabeler {
        &self.labeler
    }
}

impl eframe::App for LabeledPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(source) = self.pending_enable.take() {
            let lines = self.plot.line_refs();
            if let Err(err) = self.labeler.enable_with(&self.plot, &lines, source) {
                tracing::error!(%err, "could not enable interactive labeling");
            }
        }
        egui::CentralPanel::default().show(ctx, |ui| {
            self.plot.show(ui, &mut self.labeler);
        });
    }
}

/// Launch a labeled plot in a native window.
///
/// Each series is a `(name, points)` pair; identifiers come from `source`.
/// The call blocks until the window is closed.
pub fn run_labeled(
    title: &str,
    series: Vec<(String, Vec<[f64; 2]>)>,
    source: IdentifierSource,
) -> eframe::Result<()> {
    let mut plot = LabeledPlot::new(title);
    for (name, points) in series {
        plot.add_series(name, points);
    }
    let app = LabeledPlotApp::new(plot, LineLabeler::new(), source);

    let opts = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 650.0]),
        ..Default::default()
    };
    let title = title.to_owned();
    eframe::run_native(&title, opts, Box::new(move |_cc| Ok(Box::new(app))))
}
