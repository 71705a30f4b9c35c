//! Building model: the ordered floor sequence and the proportional scaling
//! that keeps the rendered tower inside a fixed height budget.
//!
//! Boss classification here is display-only and uses a 5-based rule, distinct
//! from the 10-based generation-time boss rounds. Floors 5, 10, 15, ... are
//! drawn tall with a defeated boss face; floor 10 additionally happens to be a
//! generation boss round. The two rules are independent.

/// Base floor height in pixels before scaling.
pub const UNIT_HEIGHT: f64 = 60.0;
/// Boss floors are this many units tall.
pub const BOSS_MULTIPLIER: f64 = 3.0;
/// The rendered building never exceeds this height.
pub const MAX_HEIGHT: f64 = 480.0;

const FLOOR_WIDTH: f64 = 180.0;
const BOSS_FLOOR_WIDTH: f64 = 220.0;
const WINDOW_SIZE: f64 = 35.0;
const BOSS_FACE_FONT: f64 = 50.0;

/// Decoration drawn on a floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FloorKind {
    /// Ground floor: two windows around a door.
    Entrance,
    /// Regular floor: a row of windows.
    Windows,
    /// Defeated-boss floor: three units tall, boss face.
    Boss,
}

/// One cleared problem, as a building segment.
#[derive(Clone, Copy, Debug)]
pub struct FloorRecord {
    pub kind: FloorKind,
}

impl FloorRecord {
    pub fn is_boss(&self) -> bool {
        matches!(self.kind, FloorKind::Boss)
    }
}

/// Pixel sizes for one rendered floor, already truncated toward zero.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloorLayout {
    pub kind: FloorKind,
    pub is_boss: bool,
    pub width_px: u32,
    pub height_px: u32,
    pub window_w_px: u32,
    pub window_h_px: u32,
    /// Door size; only meaningful on the entrance floor.
    pub door_w_px: u32,
    pub door_h_px: u32,
    /// Boss-face font size; only meaningful on boss floors.
    pub boss_face_px: u32,
}

/// Scale factor plus per-floor pixel sizes, bottom floor first.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildingLayout {
    pub scale: f64,
    pub floors: Vec<FloorLayout>,
}

/// Ordered floor sequence. Length always equals the progression tracker's
/// `floors_cleared`; floors are appended on success and cleared on collapse —
/// there is no independent source of truth.
#[derive(Debug, Default)]
pub struct Building {
    floors: Vec<FloorRecord>,
}

impl Building {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn floors(&self) -> &[FloorRecord] {
        &self.floors
    }

    pub fn len(&self) -> usize {
        self.floors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    /// Append the floor for the problem just cleared. `floors_cleared_after`
    /// is the progression counter after the increment (1-based floor number).
    pub fn append_floor(&mut self, floors_cleared_after: u32) {
        let kind = if floors_cleared_after % 5 == 0 {
            FloorKind::Boss
        } else if floors_cleared_after == 1 {
            FloorKind::Entrance
        } else {
            FloorKind::Windows
        };
        self.floors.push(FloorRecord { kind });
    }

    pub fn reset(&mut self) {
        self.floors.clear();
    }

    /// Uniform shrink factor fitting the tower under [`MAX_HEIGHT`]. Pure in
    /// the floor sequence, so applying it twice yields the same value.
    pub fn compute_scale(&self) -> f64 {
        let total: f64 = self
            .floors
            .iter()
            .map(|f| {
                if f.is_boss() {
                    UNIT_HEIGHT * BOSS_MULTIPLIER
                } else {
                    UNIT_HEIGHT
                }
            })
            .sum();
        if total > MAX_HEIGHT {
            MAX_HEIGHT / total
        } else {
            1.0
        }
    }

    /// Full render description: every dimension is `floor(base * scale)`.
    /// Window heights derive from the already-truncated window size, matching
    /// how the proportions were originally tuned.
    pub fn layout(&self) -> BuildingLayout {
        let scale = self.compute_scale();
        let trunc = |base: f64| (base * scale).floor() as u32;

        let floor_h = trunc(UNIT_HEIGHT);
        let boss_floor_h = trunc(UNIT_HEIGHT * BOSS_MULTIPLIER);
        let floor_w = trunc(FLOOR_WIDTH);
        let boss_floor_w = trunc(BOSS_FLOOR_WIDTH);
        let window = trunc(WINDOW_SIZE);
        let window_f = window as f64;

        let floors = self
            .floors
            .iter()
            .map(|f| {
                let is_boss = f.is_boss();
                FloorLayout {
                    kind: f.kind,
                    is_boss,
                    width_px: if is_boss { boss_floor_w } else { floor_w },
                    height_px: if is_boss { boss_floor_h } else { floor_h },
                    window_w_px: window,
                    window_h_px: if is_boss {
                        (window_f * 2.5).floor() as u32
                    } else {
                        (window_f * 1.14).floor() as u32
                    },
                    door_w_px: (window_f * 1.14).floor() as u32,
                    door_h_px: (window_f * 1.43).floor() as u32,
                    boss_face_px: trunc(BOSS_FACE_FONT),
                }
            })
            .collect();

        BuildingLayout { scale, floors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(n: u32) -> Building {
        let mut b = Building::new();
        for k in 1..=n {
            b.append_floor(k);
        }
        b
    }

    #[test]
    fn boss_floors_every_fifth() {
        let b = build(15);
        for (i, f) in b.floors().iter().enumerate() {
            let number = i as u32 + 1;
            assert_eq!(
                f.is_boss(),
                number % 5 == 0,
                "floor {number} misclassified"
            );
        }
    }

    #[test]
    fn first_floor_is_entrance() {
        let b = build(3);
        assert_eq!(b.floors()[0].kind, FloorKind::Entrance);
        assert_eq!(b.floors()[1].kind, FloorKind::Windows);
        assert_eq!(b.floors()[2].kind, FloorKind::Windows);
    }

    #[test]
    fn sequence_length_tracks_floor_count() {
        let mut b = build(7);
        assert_eq!(b.len(), 7);
        b.reset();
        assert!(b.is_empty());
    }

    #[test]
    fn scale_is_one_while_under_budget() {
        // 4 floors, no boss: 240 <= 480.
        let b = build(4);
        assert_eq!(b.compute_scale(), 1.0);
    }

    #[test]
    fn scale_for_twenty_plain_floors() {
        let mut b = Building::new();
        for _ in 0..20 {
            // Use non-multiple-of-5 numbers so no boss floors appear.
            b.append_floor(1);
        }
        // totalHeight = 1200 > 480 => scale = 0.4
        let scale = b.compute_scale();
        assert!((scale - 0.4).abs() < 1e-12);
        let layout = b.layout();
        assert_eq!(layout.floors[0].height_px, 24); // floor(60 * 0.4)
        assert_eq!(layout.floors[0].width_px, 72); // floor(180 * 0.4)
        assert_eq!(layout.floors[0].window_w_px, 14); // floor(35 * 0.4)
    }

    #[test]
    fn scale_accounts_for_boss_height() {
        // 5 floors with floor 5 a boss: 4*60 + 180 = 420 <= 480.
        let b = build(5);
        assert_eq!(b.compute_scale(), 1.0);
        // One more floor pushes it over: 5*60 + 180 = 480, still not over.
        let b = build(6);
        assert_eq!(b.compute_scale(), 1.0);
        // 7 floors: 6*60 + 180 = 540 > 480.
        let b = build(7);
        assert!((b.compute_scale() - 480.0 / 540.0).abs() < 1e-12);
    }

    #[test]
    fn compute_scale_is_idempotent() {
        let b = build(23);
        assert_eq!(b.compute_scale(), b.compute_scale());
    }

    #[test]
    fn layout_dimensions_are_truncated() {
        let b = build(7); // scale = 480/540 = 0.888...
        let layout = b.layout();
        let scale = layout.scale;
        for f in &layout.floors {
            let base_h = if f.is_boss { 180.0 } else { 60.0 };
            let base_w = if f.is_boss { 220.0 } else { 180.0 };
            assert_eq!(f.height_px, (base_h * scale).floor() as u32);
            assert_eq!(f.width_px, (base_w * scale).floor() as u32);
            assert_eq!(f.window_w_px, (35.0 * scale).floor() as u32);
            let ws = f.window_w_px as f64;
            let expect_wh = if f.is_boss { ws * 2.5 } else { ws * 1.14 };
            assert_eq!(f.window_h_px, expect_wh.floor() as u32);
        }
    }

    #[test]
    fn unscaled_layout_uses_base_sizes() {
        let b = build(2);
        let layout = b.layout();
        assert_eq!(layout.scale, 1.0);
        let f = &layout.floors[0];
        assert_eq!((f.width_px, f.height_px), (180, 60));
        assert_eq!(f.window_w_px, 35);
        assert_eq!(f.window_h_px, 39); // floor(35 * 1.14)
        assert_eq!((f.door_w_px, f.door_h_px), (39, 50)); // floor(35*1.14), floor(35*1.43)
    }
}
