//! Charts egui_plot has no item for, drawn straight onto a painter.

use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{
    pos2, vec2, Align2, Color32, FontId, Mesh, Pos2, Rect, RichText, Sense, Shape, Stroke,
    Ui, Vec2,
};

use crate::color::{contrast_text, ColorMap, ColorScale};
use crate::data::chart::{Heatmap, PieChart};

// ---------------------------------------------------------------------------
// Pie / donut
// ---------------------------------------------------------------------------

const PIE_SIZE: f32 = 320.0;
/// Radians per mesh segment along an arc.
const ARC_STEP: f32 = 0.03;

/// Filled annular sector from `start` sweeping `sweep` radians clockwise.
/// `inner == 0` gives a plain pie wedge.
fn sector(center: Pos2, inner: f32, outer: f32, start: f32, sweep: f32, color: Color32) -> Shape {
    let steps = ((sweep / ARC_STEP).ceil() as usize).max(1);
    let mut mesh = Mesh::default();
    for k in 0..=steps {
        let a = start + sweep * k as f32 / steps as f32;
        let dir = Vec2::angled(a);
        mesh.colored_vertex(center + dir * inner, color);
        mesh.colored_vertex(center + dir * outer, color);
    }
    for k in 0..steps as u32 {
        let i = 2 * k;
        mesh.add_triangle(i, i + 1, i + 3);
        mesh.add_triangle(i, i + 3, i + 2);
    }
    Shape::mesh(mesh)
}

/// Angle of `offset` measured clockwise from twelve o'clock, in `[0, TAU)`.
fn clock_angle(offset: Vec2) -> f32 {
    (offset.y.atan2(offset.x) + FRAC_PI_2).rem_euclid(TAU)
}

pub fn pie_chart(ui: &mut Ui, chart: &PieChart) {
    ui.label(RichText::new(&chart.title).strong());

    let colors = ColorMap::new(chart.slices.iter().map(|(l, _)| l.as_str()));
    let total = chart.total();
    let separator = ui.visuals().panel_fill;

    ui.horizontal(|ui: &mut Ui| {
        let (response, painter) = ui.allocate_painter(Vec2::splat(PIE_SIZE), Sense::hover());
        let center = response.rect.center();
        let outer = PIE_SIZE / 2.0 - 8.0;
        let inner = outer * chart.hole;

        let hover = response.hover_pos().and_then(|p| {
            let d = p - center;
            (d.length() >= inner && d.length() <= outer).then(|| clock_angle(d))
        });
        let mut hovered = None;

        let mut offset = 0.0_f32;
        for (label, value) in &chart.slices {
            let share = value / total;
            let sweep = share as f32 * TAU;
            let color = colors.color_for(label);
            painter.add(sector(center, inner, outer, offset - FRAC_PI_2, sweep, color));

            if share >= 0.03 {
                let mid = offset - FRAC_PI_2 + sweep / 2.0;
                let r = if inner > 0.0 { (inner + outer) / 2.0 } else { outer * 0.65 };
                painter.text(
                    center + Vec2::angled(mid) * r,
                    Align2::CENTER_CENTER,
                    format!("{:.1}%", share * 100.0),
                    FontId::proportional(12.0),
                    contrast_text(color),
                );
            }
            if hover.is_some_and(|a| a >= offset && a < offset + sweep) {
                hovered = Some(format!("{label}: {value} ({:.1}%)", share * 100.0));
            }
            offset += sweep;
        }

        // Thin gaps between slices.
        if chart.slices.len() > 1 {
            let mut offset = 0.0_f32;
            for (_, value) in &chart.slices {
                let dir = Vec2::angled(offset - FRAC_PI_2);
                painter.line_segment(
                    [center + dir * inner, center + dir * outer],
                    Stroke::new(1.5, separator),
                );
                offset += (value / total) as f32 * TAU;
            }
        }

        if let Some(text) = hovered {
            response.on_hover_text(text);
        }

        ui.vertical(|ui: &mut Ui| {
            for (label, _) in &chart.slices {
                ui.horizontal(|ui: &mut Ui| {
                    let (swatch, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
                    ui.painter().rect_filled(swatch, 2.0, colors.color_for(label));
                    ui.label(label);
                });
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

const LABEL_WIDTH: f32 = 130.0;
const COLORBAR_WIDTH: f32 = 14.0;
const COLORBAR_GAP: f32 = 16.0;
const COLORBAR_STRIPS: usize = 48;

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn cell_color(heat: &Heatmap, v: f64) -> Color32 {
    if v.is_finite() {
        ColorScale::CoolWarm.sample_range(v, heat.min, heat.max)
    } else {
        Color32::DARK_GRAY
    }
}

pub fn heatmap(ui: &mut Ui, heat: &Heatmap) {
    let n = heat.labels.len();
    if n == 0 {
        return;
    }
    let text_color = ui.visuals().text_color();
    let spare = ui.available_width() - LABEL_WIDTH - COLORBAR_GAP - COLORBAR_WIDTH - 60.0;
    let cell = (spare / n as f32).clamp(22.0, 72.0);
    let grid_side = cell * n as f32;

    let size = vec2(
        LABEL_WIDTH + grid_side + COLORBAR_GAP + COLORBAR_WIDTH + 60.0,
        grid_side + 24.0,
    );
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min + vec2(LABEL_WIDTH, 0.0);

    let label_chars = ((cell / 7.0) as usize).max(3);
    for (i, row) in heat.matrix.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            let rect = Rect::from_min_size(
                origin + vec2(j as f32 * cell, i as f32 * cell),
                Vec2::splat(cell),
            );
            let color = cell_color(heat, v);
            painter.rect_filled(rect, 0.0, color);
            if cell >= 28.0 {
                let text = if v.is_finite() { format!("{v:.2}") } else { "NaN".to_string() };
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    text,
                    FontId::proportional(11.0),
                    contrast_text(color),
                );
            }
        }

        let label = &heat.labels[i];
        painter.text(
            pos2(origin.x - 6.0, origin.y + (i as f32 + 0.5) * cell),
            Align2::RIGHT_CENTER,
            truncate(label, 18),
            FontId::proportional(12.0),
            text_color,
        );
        painter.text(
            pos2(origin.x + (i as f32 + 0.5) * cell, origin.y + grid_side + 4.0),
            Align2::CENTER_TOP,
            truncate(label, label_chars),
            FontId::proportional(12.0),
            text_color,
        );
    }

    // Colour bar, max at the top.
    let bar_x = origin.x + grid_side + COLORBAR_GAP;
    let strip_h = grid_side / COLORBAR_STRIPS as f32;
    for k in 0..COLORBAR_STRIPS {
        let t = 1.0 - (k as f32 + 0.5) / COLORBAR_STRIPS as f32;
        let rect = Rect::from_min_size(
            pos2(bar_x, origin.y + k as f32 * strip_h),
            vec2(COLORBAR_WIDTH, strip_h + 0.5),
        );
        painter.rect_filled(rect, 0.0, ColorScale::CoolWarm.sample(t));
    }
    for (value, y, anchor) in [
        (heat.max, origin.y, Align2::LEFT_TOP),
        (heat.min, origin.y + grid_side, Align2::LEFT_BOTTOM),
    ] {
        painter.text(
            pos2(bar_x + COLORBAR_WIDTH + 4.0, y),
            anchor,
            format!("{value:.2}"),
            FontId::proportional(11.0),
            text_color,
        );
    }

    if let Some(p) = response.hover_pos() {
        let local = p - origin;
        if local.x >= 0.0 && local.y >= 0.0 && local.x < grid_side && local.y < grid_side {
            let i = ((local.y / cell) as usize).min(n - 1);
            let j = ((local.x / cell) as usize).min(n - 1);
            let v = heat.matrix[i][j];
            response.on_hover_text(format!("{} × {}: {v:.3}", heat.labels[i], heat.labels[j]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_angle_starts_at_twelve() {
        assert!(clock_angle(vec2(0.0, -1.0)).abs() < 1e-6);
        assert!((clock_angle(vec2(1.0, 0.0)) - FRAC_PI_2).abs() < 1e-6);
        assert!((clock_angle(vec2(-1.0, 0.0)) - 3.0 * FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn sector_mesh_has_two_triangles_per_step() {
        let Shape::Mesh(mesh) = sector(pos2(0.0, 0.0), 0.0, 10.0, 0.0, 0.25, Color32::RED) else {
            panic!("expected a mesh");
        };
        // 0.25 rad in 0.03 rad steps → 9 segments.
        assert_eq!(mesh.vertices.len(), 20);
        assert_eq!(mesh.indices.len(), 54);
    }

    #[test]
    fn long_labels_are_truncated() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
    }
}
