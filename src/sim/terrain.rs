//! Procedural tunnel terrain
//!
//! The tunnel is a strip of fixed-width segments, each with a ceiling band at
//! the top of the screen and a floor band at the bottom. Segments scroll left;
//! when the leftmost one is fully off screen it is recycled onto the right end,
//! so the strip always covers `[0, SCREEN_WIDTH]` without gaps.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH, SCROLL_SPEED};

pub const SEGMENT_WIDTH: f32 = 40.0;

/// Discrete floor heights used by tech stages
const TECH_FLOOR_STEPS: [f32; 4] = [50.0, 90.0, 130.0, 170.0];
/// Discrete ceiling heights used by tech stages
const TECH_CEIL_STEPS: [f32; 3] = [40.0, 70.0, 100.0];
/// Chance a tech segment repeats the previous heights (flat platforms)
const TECH_REPEAT_CHANCE: f64 = 0.7;

/// Visual/generation style of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Biome {
    /// Rough random rock
    #[default]
    Cave,
    /// Stepped flat platforms
    Tech,
    /// Smooth organic waves
    Alien,
}

impl Biome {
    /// Biome cycles every three stages (stage is 1-based)
    pub fn for_stage(stage: u32) -> Self {
        match stage.saturating_sub(1) % 3 {
            0 => Biome::Cave,
            1 => Biome::Tech,
            _ => Biome::Alien,
        }
    }

    /// (floor, ceiling) colours
    pub fn colors(&self) -> ([f32; 4], [f32; 4]) {
        match self {
            Biome::Cave => ([0.4, 0.33, 0.27, 1.0], [0.33, 0.27, 0.2, 1.0]),
            Biome::Tech => ([0.35, 0.4, 0.5, 1.0], [0.25, 0.3, 0.4, 1.0]),
            Biome::Alien => ([0.3, 0.55, 0.3, 1.0], [0.45, 0.2, 0.5, 1.0]),
        }
    }
}

/// One vertical slice of the tunnel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Segment {
    pub x: f32,
    pub width: f32,
    pub biome: Biome,
    /// Y of the floor's top surface
    pub floor_y: f32,
    /// Y of the ceiling's bottom surface
    pub ceil_y: f32,
    pub floor_color: [f32; 4],
    pub ceil_color: [f32; 4],
}

impl Segment {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Thickness of the floor band
    pub fn floor_height(&self) -> f32 {
        SCREEN_HEIGHT - self.floor_y
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    segments: Vec<Segment>,
    biome: Biome,
    /// Heights of the last tech segment, reused for flat runs
    last_tech: Option<(f32, f32)>,
}

impl Terrain {
    /// Build a full-screen strip for the given stage
    pub fn new(stage: u32, rng: &mut Pcg32) -> Self {
        let mut terrain = Self {
            segments: Vec::new(),
            biome: Biome::for_stage(stage),
            last_tech: None,
        };
        terrain.fill(rng);
        terrain
    }

    /// Rebuild the strip for a (possibly different) stage
    pub fn reset(&mut self, stage: u32, rng: &mut Pcg32) {
        self.segments.clear();
        self.biome = Biome::for_stage(stage);
        self.last_tech = None;
        self.fill(rng);
    }

    /// Cover the screen width plus one extra segment
    fn fill(&mut self, rng: &mut Pcg32) {
        let mut x = 0.0;
        while x < SCREEN_WIDTH + SEGMENT_WIDTH {
            self.add_segment(x, rng);
            x += SEGMENT_WIDTH;
        }
    }

    pub fn biome(&self) -> Biome {
        self.biome
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Append one segment at `x` with heights drawn from the current biome
    pub fn add_segment(&mut self, x: f32, rng: &mut Pcg32) {
        let (floor_height, ceil_height) = match self.biome {
            Biome::Cave => (
                rng.random_range(50.0..200.0),
                rng.random_range(50.0..100.0),
            ),
            Biome::Tech => {
                let heights = match self.last_tech {
                    Some(prev) if rng.random_bool(TECH_REPEAT_CHANCE) => prev,
                    _ => (
                        TECH_FLOOR_STEPS[rng.random_range(0..TECH_FLOOR_STEPS.len())],
                        TECH_CEIL_STEPS[rng.random_range(0..TECH_CEIL_STEPS.len())],
                    ),
                };
                self.last_tech = Some(heights);
                heights
            }
            Biome::Alien => (
                100.0 + 80.0 * (x * 0.01).sin() + rng.random_range(0.0..40.0),
                80.0 + 60.0 * (x * 0.01).cos() + rng.random_range(0.0..20.0),
            ),
        };

        let (floor_color, ceil_color) = self.biome.colors();
        self.segments.push(Segment {
            x,
            width: SEGMENT_WIDTH,
            biome: self.biome,
            floor_y: SCREEN_HEIGHT - floor_height,
            ceil_y: ceil_height,
            floor_color,
            ceil_color,
        });
    }

    /// Scroll one tick and recycle the leftmost segment once it is off screen
    pub fn update(&mut self, rng: &mut Pcg32) {
        for seg in &mut self.segments {
            seg.x -= SCROLL_SPEED;
        }

        let off_screen = self.segments.first().is_some_and(|s| s.right() < 0.0);
        if off_screen {
            self.segments.remove(0);
            let next_x = self
                .segments
                .last()
                .map(|s| s.right())
                .unwrap_or(0.0);
            self.add_segment(next_x, rng);
        }
    }

    /// True if `rect` cuts into the ceiling or floor of any segment it spans
    pub fn check_collision(&self, rect: &Rect) -> bool {
        self.segments
            .iter()
            .filter(|s| rect.overlaps_x(s.x, s.right()))
            .any(|s| rect.top() < s.ceil_y || rect.bottom() > s.floor_y)
    }

    /// (ceil_y, floor_y) of the segment covering `x`
    pub fn gap_at(&self, x: f32) -> Option<(f32, f32)> {
        self.segments
            .iter()
            .find(|s| s.x <= x && x < s.right())
            .map(|s| (s.ceil_y, s.floor_y))
    }

    #[cfg(test)]
    pub(crate) fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    /// Force a uniform corridor (tests only)
    #[cfg(test)]
    pub(crate) fn flatten(&mut self, ceil_y: f32, floor_y: f32) {
        for seg in &mut self.segments {
            seg.ceil_y = ceil_y;
            seg.floor_y = floor_y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn covers_screen(terrain: &Terrain) -> bool {
        let segs = terrain.segments();
        let starts_ok = segs.first().is_some_and(|s| s.x <= 0.0);
        let ends_ok = segs.last().is_some_and(|s| s.right() >= SCREEN_WIDTH);
        let contiguous = segs.windows(2).all(|w| (w[0].right() - w[1].x).abs() < 1e-3);
        starts_ok && ends_ok && contiguous
    }

    #[test]
    fn test_biome_cycle() {
        assert_eq!(Biome::for_stage(1), Biome::Cave);
        assert_eq!(Biome::for_stage(2), Biome::Tech);
        assert_eq!(Biome::for_stage(3), Biome::Alien);
        assert_eq!(Biome::for_stage(4), Biome::Cave);
    }

    #[test]
    fn test_initial_fill() {
        let mut rng = Pcg32::seed_from_u64(1);
        let terrain = Terrain::new(1, &mut rng);
        // 0..840 in steps of 40
        assert_eq!(terrain.segments().len(), 21);
        assert!(covers_screen(&terrain));
    }

    #[test]
    fn test_cave_ranges() {
        let mut rng = Pcg32::seed_from_u64(2);
        let terrain = Terrain::new(1, &mut rng);
        for seg in terrain.segments() {
            assert!((50.0..=200.0).contains(&seg.floor_height()));
            assert!((50.0..100.0).contains(&seg.ceil_y));
        }
    }

    #[test]
    fn test_tech_uses_steps() {
        let mut rng = Pcg32::seed_from_u64(3);
        let terrain = Terrain::new(2, &mut rng);
        assert_eq!(terrain.biome(), Biome::Tech);
        for seg in terrain.segments() {
            assert!(TECH_FLOOR_STEPS.contains(&seg.floor_height()));
            assert!(TECH_CEIL_STEPS.contains(&seg.ceil_y));
        }
    }

    #[test]
    fn test_alien_follows_wave() {
        let mut rng = Pcg32::seed_from_u64(4);
        let terrain = Terrain::new(3, &mut rng);
        for seg in terrain.segments() {
            let base_floor = 100.0 + 80.0 * (seg.x * 0.01).sin();
            let base_ceil = 80.0 + 60.0 * (seg.x * 0.01).cos();
            let floor_jitter = seg.floor_height() - base_floor;
            let ceil_jitter = seg.ceil_y - base_ceil;
            assert!((-1e-3..40.001).contains(&floor_jitter));
            assert!((-1e-3..20.001).contains(&ceil_jitter));
        }
    }

    #[test]
    fn test_collision_bands() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut terrain = Terrain::new(1, &mut rng);
        terrain.flatten(100.0, 500.0);

        assert!(!terrain.check_collision(&Rect::new(100.0, 200.0, 30.0, 15.0)));
        assert!(terrain.check_collision(&Rect::new(100.0, 90.0, 30.0, 15.0)));
        assert!(terrain.check_collision(&Rect::new(100.0, 490.0, 30.0, 15.0)));
        // Only segments under the rect matter
        terrain.segments_mut()[0].ceil_y = 300.0;
        assert!(!terrain.check_collision(&Rect::new(100.0, 200.0, 30.0, 15.0)));
        assert!(terrain.check_collision(&Rect::new(10.0, 200.0, 30.0, 15.0)));
    }

    #[test]
    fn test_recycles_segment() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut terrain = Terrain::new(1, &mut rng);
        let count = terrain.segments().len();
        // 21 ticks moves the first segment's right edge to -2
        for _ in 0..21 {
            terrain.update(&mut rng);
        }
        assert_eq!(terrain.segments().len(), count);
        assert!(terrain.segments()[0].x >= -SEGMENT_WIDTH);
        assert!(covers_screen(&terrain));
    }

    proptest! {
        #[test]
        fn test_coverage_any_scroll(seed in 0u64..1000, stage in 1u32..7, ticks in 0usize..2000) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut terrain = Terrain::new(stage, &mut rng);
            for _ in 0..ticks {
                terrain.update(&mut rng);
            }
            prop_assert!(covers_screen(&terrain));
        }
    }
}
