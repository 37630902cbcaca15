//! Decorative globe illustration for the side pane.
//!
//! Purely cosmetic: concentric rings, a dashed orbit, and a meridian
//! ellipse, painted once the window is up. Mirrors the product's
//! illustrative globe artwork.

use egui::epaint::EllipseShape;
use egui::{Color32, Pos2, Sense, Shape, Stroke, Ui, Vec2};

const RING_BLUE: Color32 = Color32::from_rgb(0x43, 0x61, 0xee);
const MERIDIAN_PINK: Color32 = Color32::from_rgb(0xf7, 0x25, 0x85);
const DISC_PURPLE: Color32 = Color32::from_rgba_premultiplied(0x06, 0x01, 0x10, 26);
const CORE_BLUE: Color32 = Color32::from_rgba_premultiplied(0x0d, 0x13, 0x30, 51);

/// The globe graphic. Constructed hidden; [`Globe::mark_ready`] injects it
/// once the window is ready to paint.
#[derive(Debug, Default)]
pub struct Globe {
    ready: bool,
}

impl Globe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the graphic visible. Called once window bring-up completes.
    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Paint the globe into a square region of `size` logical pixels.
    /// Nothing is drawn before [`Globe::mark_ready`].
    pub fn paint(&self, ui: &mut Ui, size: f32) {
        if !self.ready {
            return;
        }

        let (response, painter) = ui.allocate_painter(Vec2::splat(size), Sense::hover());
        let center = response.rect.center();
        let scale = size / 400.0;

        // Outer halo disc.
        painter.circle_filled(center, 180.0 * scale, DISC_PURPLE);

        // Dashed orbit ring.
        let orbit: Vec<Pos2> = (0..=64)
            .map(|i| {
                let angle = i as f32 / 64.0 * std::f32::consts::TAU;
                center + Vec2::angled(angle) * 150.0 * scale
            })
            .collect();
        painter.extend(Shape::dashed_line(
            &orbit,
            Stroke::new(2.0, RING_BLUE),
            5.0 * scale,
            5.0 * scale,
        ));

        // Solid inner ring.
        painter.circle_stroke(center, 120.0 * scale, Stroke::new(2.0, RING_BLUE));

        // Meridian ellipse.
        painter.add(Shape::Ellipse(EllipseShape {
            center,
            radius: Vec2::new(140.0 * scale, 120.0 * scale),
            fill: Color32::TRANSPARENT,
            stroke: Stroke::new(2.0, MERIDIAN_PINK),
        }));

        // Core glow.
        painter.circle_filled(center, 60.0 * scale, CORE_BLUE);
    }
}
