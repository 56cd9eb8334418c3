//! egui_plot adapter: the bundled [`PlotSurface`] implementation.
//!
//! [`LabeledPlot`] owns the plotted series and the label visuals, renders
//! them each frame, and translates the plot response into pointer events
//! for a [`LineLabeler`]:
//! - drawing one `egui_plot::Line` per series, with legend names
//! - labels as `Text` overlays with a background fill highlight
//! - hit-testing in screen space via the previous frame's `PlotTransform`

use std::collections::HashMap;

use egui::{Align2, Color32};
use egui_plot::{Legend, Line, Plot, PlotPoint, PlotTransform, Text};

use crate::controller::LineLabeler;
use crate::label::LabelLook;
use crate::surface::{
    AxesRef, DataPos, HitTarget, LabelRef, LegendInfo, LineRef, PlotSurface, PointerAction,
    PointerEvent,
};

/// One plotted series.
struct SeriesData {
    line: LineRef,
    name: String,
    points: Vec<[f64; 2]>,
    color: Color32,
}

/// A label visual kept by the adapter, mirroring the host-side record the
/// labeler owns.
struct LabelVisual {
    pos: DataPos,
    text: String,
    look: LabelLook,
}

/// An egui_plot surface with interactive labeling support.
///
/// The single plot area is reported as axes `0`; the legend, when shown,
/// lists the series names in creation order (which is also display order).
pub struct LabeledPlot {
    id: String,
    series: Vec<SeriesData>,
    labels: HashMap<LabelRef, LabelVisual>,
    next_line: u64,
    next_label: u64,
    show_legend: bool,
    /// Pick tolerance around lines and labels, in screen pixels.
    hit_radius_px: f32,
    /// Transform of the last rendered frame; hit-testing needs it to go
    /// from data space to screen space.
    transform: Option<PlotTransform>,
    redraw: bool,
}

impl LabeledPlot {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            series: Vec::new(),
            labels: HashMap::new(),
            next_line: 0,
            next_label: 0,
            show_legend: true,
            hit_radius_px: 8.0,
            transform: None,
            redraw: false,
        }
    }

    /// Whether to attach a legend to the plot. On by default.
    pub fn show_legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self
    }

    /// Pick tolerance around lines and labels, in screen pixels.
    pub fn hit_radius(mut self, px: f32) -> Self {
        self.hit_radius_px = px;
        self
    }

    /// Add a series with an automatically allocated color.
    pub fn add_series(&mut self, name: impl Into<String>, points: Vec<[f64; 2]>) -> LineRef {
        let color = alloc_color(self.series.len());
        self.add_series_with_color(name, points, color)
    }

    /// Add a series with an explicit color.
    pub fn add_series_with_color(
        &mut self,
        name: impl Into<String>,
        points: Vec<[f64; 2]>,
        color: Color32,
    ) -> LineRef {
        self.next_line += 1;
        let line = LineRef(self.next_line);
        self.series.push(SeriesData {
            line,
            name: name.into(),
            points,
            color,
        });
        line
    }

    /// Handles of all plotted series, in display order.
    pub fn line_refs(&self) -> Vec<LineRef> {
        self.series.iter().map(|s| s.line).collect()
    }

    /// Render the plot and feed pointer events to `labeler`.
    pub fn show(&mut self, ui: &mut egui::Ui, labeler: &mut LineLabeler) {
        let mut plot = Plot::new(self.id.clone())
            .allow_scroll(false)
            .allow_drag(false)
            .allow_boxed_zoom(false);
        if self.show_legend {
            plot = plot.legend(Legend::default());
        }

        let plot_resp = plot.show(ui, |plot_ui| {
            for s in &self.series {
                plot_ui.line(
                    Line::new(s.name.clone(), s.points.clone())
                        .color(s.color)
                        .width(1.5),
                );
            }
            for vis in self.labels.values() {
                let color = vis
                    .look
                    .color_hint
                    .map(|[r, g, b]| Color32::from_rgb(r, g, b))
                    .unwrap_or(Color32::WHITE);
                let style = egui::Style::default();
                let mut job = egui::text::LayoutJob::default();
                let mut rich = egui::RichText::new(vis.text.clone())
                    .size(vis.look.text_size)
                    .color(color);
                if vis.look.background {
                    rich = rich.background_color(Color32::from_black_alpha(160));
                }
                rich.append_to(&mut job, &style, egui::FontSelection::Default, egui::Align::LEFT);
                plot_ui.text(
                    Text::new("label", PlotPoint::new(vis.pos.x, vis.pos.y), job)
                        .anchor(Align2::LEFT_BOTTOM),
                );
            }
        });

        self.transform = Some(plot_resp.transform);
        let transform = plot_resp.transform;
        let resp = &plot_resp.response;
        let to_data = |p: egui::Pos2| {
            let v = transform.value_from_position(p);
            DataPos::new(v.x, v.y)
        };

        // A click is a matched down/up pair; a drag delivers its own
        // down/move/up sequence. egui reports the two exclusively.
        if resp.drag_started_by(egui::PointerButton::Primary) {
            if let Some(p) = resp.interact_pointer_pos() {
                labeler.on_pointer_down(
                    self,
                    PointerEvent {
                        pos: to_data(p),
                        action: PointerAction::Primary,
                    },
                );
            }
        } else if resp.dragged_by(egui::PointerButton::Primary) {
            if let Some(p) = resp.interact_pointer_pos() {
                labeler.on_pointer_move(self, to_data(p));
            }
        } else if resp.drag_stopped_by(egui::PointerButton::Primary) {
            labeler.on_pointer_up(self);
        }

        if resp.clicked() {
            if let Some(p) = resp.interact_pointer_pos() {
                let pos = to_data(p);
                labeler.on_pointer_down(
                    self,
                    PointerEvent {
                        pos,
                        action: PointerAction::Primary,
                    },
                );
                labeler.on_pointer_up(self);
            }
        }
        if resp.secondary_clicked() {
            if let Some(p) = resp.interact_pointer_pos() {
                labeler.on_pointer_down(
                    self,
                    PointerEvent {
                        pos: to_data(p),
                        action: PointerAction::Secondary,
                    },
                );
            }
        }

        if std::mem::take(&mut self.redraw) {
            ui.ctx().request_repaint();
        }
    }

    /// Approximate screen rectangle of a label, grown by the hit radius.
    ///
    /// The label is anchored left-bottom at its data position; width is
    /// estimated from the glyph count, which is plenty for pick purposes.
    fn label_screen_rect(&self, vis: &LabelVisual, transform: &PlotTransform) -> egui::Rect {
        let anchor = transform.position_from_point(&PlotPoint::new(vis.pos.x, vis.pos.y));
        let width = vis.text.chars().count().max(1) as f32 * vis.look.text_size * 0.62;
        let height = vis.look.text_size * 1.35;
        egui::Rect::from_min_max(
            egui::pos2(anchor.x, anchor.y - height),
            egui::pos2(anchor.x + width, anchor.y),
        )
        .expand(self.hit_radius_px * 0.5)
    }
}

impl PlotSurface for LabeledPlot {
    fn contains_line(&self, line: LineRef) -> bool {
        self.series.iter().any(|s| s.line == line)
    }

    fn line_axes(&self, line: LineRef) -> Option<AxesRef> {
        self.contains_line(line).then_some(AxesRef(0))
    }

    fn legends(&self) -> Vec<LegendInfo> {
        if !self.show_legend {
            return Vec::new();
        }
        vec![LegendInfo {
            axes: AxesRef(0),
            captions: self.series.iter().map(|s| s.name.clone()).collect(),
        }]
    }

    fn hit_test(&self, pos: DataPos) -> HitTarget {
        let Some(transform) = &self.transform else {
            // Nothing has been rendered yet, so nothing can be hit.
            return HitTarget::None;
        };
        let screen = transform.position_from_point(&PlotPoint::new(pos.x, pos.y));

        // Labels sit on top of the data, so they win over lines.
        for (id, vis) in &self.labels {
            if self.label_screen_rect(vis, transform).contains(screen) {
                return HitTarget::Label(*id);
            }
        }

        // Nearest series vertex within the pick radius, in screen space.
        let mut best: Option<(LineRef, f32)> = None;
        for s in &self.series {
            for p in &s.points {
                let sp = transform.position_from_point(&PlotPoint::new(p[0], p[1]));
                let d2 = (sp.x - screen.x).powi(2) + (sp.y - screen.y).powi(2);
                if best.map(|(_, b)| d2 < b).unwrap_or(true) {
                    best = Some((s.line, d2));
                }
            }
        }
        match best {
            Some((line, d2)) if d2.sqrt() <= self.hit_radius_px => HitTarget::Line(line),
            _ => HitTarget::None,
        }
    }

    fn create_label(&mut self, pos: DataPos, text: &str, look: &LabelLook) -> LabelRef {
        self.next_label += 1;
        let id = LabelRef(self.next_label);
        self.labels.insert(
            id,
            LabelVisual {
                pos,
                text: text.to_owned(),
                look: look.clone(),
            },
        );
        id
    }

    fn move_label(&mut self, label: LabelRef, pos: DataPos) {
        if let Some(vis) = self.labels.get_mut(&label) {
            vis.pos = pos;
        }
    }

    fn delete_label(&mut self, label: LabelRef) {
        self.labels.remove(&label);
    }

    fn request_redraw(&mut self) {
        self.redraw = true;
    }
}

/// Allocate a distinct color for the given series index.
fn alloc_color(index: usize) -> Color32 {
    const PALETTE: [Color32; 10] = [
        Color32::from_rgb(31, 119, 180),
        Color32::from_rgb(255, 127, 14),
        Color32::from_rgb(44, 160, 44),
        Color32::from_rgb(214, 39, 40),
        Color32::from_rgb(148, 103, 189),
        Color32::from_rgb(140, 86, 75),
        Color32::from_rgb(227, 119, 194),
        Color32::from_rgb(127, 127, 127),
        Color32::from_rgb(188, 189, 34),
        Color32::from_rgb(23, 190, 207),
    ];
    PALETTE[index % PALETTE.len()]
}
