//! Parallax background stars (visual only)

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub const STAR_COUNT: usize = 50;

#[derive(Debug, Clone, Copy)]
pub struct Star {
    pub pos: Vec2,
    pub speed: f32,
    pub size: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Starfield {
    pub stars: Vec<Star>,
}

impl Starfield {
    pub fn new(rng: &mut Pcg32) -> Self {
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.random_range(0.0..SCREEN_WIDTH),
                    rng.random_range(0.0..SCREEN_HEIGHT),
                ),
                speed: rng.random_range(0.5..2.5),
                size: rng.random_range(0.0..1.5),
            })
            .collect();
        Self { stars }
    }

    /// Scroll left, wrapping stars back in at the right edge
    pub fn update(&mut self, rng: &mut Pcg32) {
        for star in &mut self.stars {
            star.pos.x -= star.speed;
            if star.pos.x < 0.0 {
                star.pos.x = SCREEN_WIDTH;
                star.pos.y = rng.random_range(0.0..SCREEN_HEIGHT);
            }
        }
    }
}
