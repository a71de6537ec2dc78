use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};

pub(super) const DEFAULT_CHART_HEIGHT: f32 = 600.0;

const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 10.0;

// d3's schemeCategory10, indexed by node degree.
const DEGREE_COLORS: [Color32; 10] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0x2c, 0xa0, 0x2c),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0x94, 0x67, 0xbd),
    Color32::from_rgb(0x8c, 0x56, 0x4b),
    Color32::from_rgb(0xe3, 0x77, 0xc2),
    Color32::from_rgb(0x7f, 0x7f, 0x7f),
    Color32::from_rgb(0xbc, 0xbd, 0x22),
    Color32::from_rgb(0x17, 0xbe, 0xcf),
];

/// Affine view onto layout space: translate by (x, y), scale by k. Node
/// positions never carry the transform; it is applied at draw time only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct ViewTransform {
    pub x: f32,
    pub y: f32,
    pub k: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        k: 1.0,
    };

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Rescales while keeping the layout point under `anchor` (in local
    /// screen coordinates) fixed on screen.
    pub fn zoom_about(&mut self, anchor: Vec2, factor: f32) {
        let next_k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let ratio = next_k / self.k;
        self.x = anchor.x - ((anchor.x - self.x) * ratio);
        self.y = anchor.y - ((anchor.y - self.y) * ratio);
        self.k = next_k;
    }

    pub fn lerp(from: Self, to: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            x: from.x + ((to.x - from.x) * t),
            y: from.y + ((to.y - from.y) * t),
            k: from.k + ((to.k - from.k) * t),
        }
    }
}

pub(super) fn world_to_screen(rect: Rect, transform: ViewTransform, world: Vec2) -> Pos2 {
    rect.left_top() + vec2(transform.x, transform.y) + (world * transform.k)
}

pub(super) fn screen_to_world(rect: Rect, transform: ViewTransform, screen: Pos2) -> Vec2 {
    (screen - rect.left_top() - vec2(transform.x, transform.y)) / transform.k
}

pub(super) fn degree_color(degree: usize) -> Color32 {
    DEGREE_COLORS[degree % DEGREE_COLORS.len()]
}

pub(super) fn darker(color: Color32) -> Color32 {
    Color32::from_rgb(
        (color.r() as f32 * 0.49) as u8,
        (color.g() as f32 * 0.49) as u8,
        (color.b() as f32 * 0.49) as u8,
    )
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, transform: ViewTransform) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * transform.k.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.left_top() + vec2(transform.x, transform.y);

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        y += step;
    }
}
