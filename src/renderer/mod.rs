//! Backend-neutral rendering
//!
//! The game builds a `Frame` (an ordered list of filled shapes) from the
//! state once per displayed frame and hands it to a `RenderSink`. Canvas-like
//! backends paint the shapes directly; GPU backends can call
//! `Frame::vertices` for a triangle list.

pub mod shapes;
pub mod vertex;

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::entity::CAPSULE_SIZE;
use crate::sim::state::PLAYER_DEATH_TICKS;
use crate::sim::{Bullet, BulletKind, Enemy, EnemyKind, GamePhase, GameState, Player, Rect};
pub use vertex::{Vertex, colors};

const CIRCLE_SEGMENTS: u32 = 24;
/// Engine flame is lit for 3 of every 6 frames
const FLAME_PERIOD: u64 = 6;
/// Invincibility blink half-period (ticks)
const BLINK_TICKS: u32 = 4;
/// Boss flash half-period while dying (ticks)
const BOSS_FLASH_TICKS: u32 = 5;
const HP_BAR_HEIGHT: f32 = 6.0;
const HP_BAR_GAP: f32 = 10.0;

/// A filled primitive in screen pixels
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect { rect: Rect, color: [f32; 4] },
    Ellipse { center: Vec2, radii: Vec2, color: [f32; 4] },
    Circle { center: Vec2, radius: f32, color: [f32; 4] },
    Ring { center: Vec2, inner: f32, outer: f32, color: [f32; 4] },
    /// Fan-triangulated from the first point
    Polygon { points: Vec<Vec2>, color: [f32; 4] },
}

/// Everything to paint for one displayed frame, back to front
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub clear: [f32; 4],
    pub shapes: Vec<Shape>,
}

/// Something that can present frames
pub trait RenderSink {
    fn present(&mut self, frame: &Frame);
}

impl Frame {
    fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    fn rect(&mut self, rect: Rect, color: [f32; 4]) {
        self.push(Shape::Rect { rect, color });
    }

    /// Triangle list for GPU backends
    pub fn vertices(&self) -> Vec<Vertex> {
        let mut out = Vec::new();
        for shape in &self.shapes {
            let verts = match shape {
                Shape::Rect { rect, color } => shapes::rect(rect, *color),
                Shape::Ellipse {
                    center,
                    radii,
                    color,
                } => shapes::ellipse(*center, *radii, *color, CIRCLE_SEGMENTS),
                Shape::Circle {
                    center,
                    radius,
                    color,
                } => shapes::circle(*center, *radius, *color, CIRCLE_SEGMENTS),
                Shape::Ring {
                    center,
                    inner,
                    outer,
                    color,
                } => shapes::ring(*center, *inner, *outer, *color, CIRCLE_SEGMENTS),
                Shape::Polygon { points, color } => shapes::polygon(points, *color),
            };
            out.extend(verts);
        }
        out
    }
}

/// Build the frame for the current state
pub fn build_frame(state: &GameState, settings: &Settings) -> Frame {
    let mut frame = Frame {
        clear: colors::BACKGROUND,
        shapes: Vec::new(),
    };

    for star in &state.starfield.stars {
        frame.rect(
            Rect::from_pos_size(star.pos, Vec2::splat(star.size)),
            colors::STAR,
        );
    }

    // Nothing but the starfield behind the title screen
    if state.phase == GamePhase::Menu {
        return frame;
    }

    for seg in state.terrain.segments() {
        // One pixel of overlap hides seams between segments
        frame.rect(
            Rect::new(seg.x, 0.0, seg.width + 1.0, seg.ceil_y),
            seg.ceil_color,
        );
        frame.rect(
            Rect::new(seg.x, seg.floor_y, seg.width + 1.0, seg.floor_height()),
            seg.floor_color,
        );
    }

    match state.phase {
        GamePhase::Playing | GamePhase::StageComplete => {
            draw_player(&mut frame, &state.player, state.frame_count, settings);
        }
        GamePhase::Dying => draw_explosion(&mut frame, &state.player, state.death_timer),
        _ => {}
    }

    for bullet in state.bullets.iter().filter(|b| b.active) {
        draw_bullet(&mut frame, bullet);
    }

    for capsule in state.capsules.iter().filter(|c| c.active) {
        let center = capsule.pos + CAPSULE_SIZE / 2.0;
        frame.push(Shape::Ellipse {
            center,
            radii: CAPSULE_SIZE / 2.0,
            color: colors::CAPSULE,
        });
        frame.push(Shape::Ellipse {
            center: center - Vec2::new(0.0, 2.0),
            radii: Vec2::new(6.0, 3.0),
            color: colors::CAPSULE_HIGHLIGHT,
        });
    }

    for enemy in state.enemies.iter().filter(|e| e.active) {
        draw_enemy(&mut frame, enemy, settings);
    }

    frame
}

fn draw_player(frame: &mut Frame, player: &Player, frame_count: u64, settings: &Settings) {
    let blinking = player.invincible_timer > 0
        && !settings.reduced_motion
        && (player.invincible_timer / BLINK_TICKS) % 2 == 1;
    if blinking {
        return;
    }

    let Vec2 { x, y } = player.pos;
    let Vec2 { x: w, y: h } = player.size;
    frame.push(Shape::Polygon {
        points: vec![
            Vec2::new(x + w, y + h / 2.0),
            Vec2::new(x, y),
            Vec2::new(x + 5.0, y + h / 2.0),
            Vec2::new(x, y + h),
        ],
        color: colors::PLAYER,
    });

    if frame_count % FLAME_PERIOD < FLAME_PERIOD / 2 {
        frame.rect(Rect::new(x - 5.0, y + 4.0, 5.0, 6.0), colors::ENGINE_FLAME);
    }

    if player.has_shield {
        let center = player.rect().center();
        frame.push(Shape::Ring {
            center,
            inner: w * 0.7,
            outer: w * 0.7 + 2.0,
            color: colors::SHIELD,
        });
    }
}

/// Expanding fireball over the player's last position
fn draw_explosion(frame: &mut Frame, player: &Player, death_timer: u32) {
    let progress = PLAYER_DEATH_TICKS.saturating_sub(death_timer) as f32;
    if progress <= 0.0 {
        return;
    }
    let center = player.rect().center();

    let green = ((255.0 - progress * 4.0) / 255.0).max(0.0);
    let fade = (1.0 - progress / PLAYER_DEATH_TICKS as f32).max(0.0);
    frame.push(Shape::Circle {
        center,
        radius: progress * 2.0,
        color: [1.0, green, 0.0, fade],
    });

    let core_alpha = 1.0 - progress / 40.0;
    if core_alpha > 0.0 {
        frame.push(Shape::Circle {
            center,
            radius: progress,
            color: [1.0, 1.0, 1.0, core_alpha],
        });
    }
}

fn draw_bullet(frame: &mut Frame, bullet: &Bullet) {
    let color = match bullet.kind {
        BulletKind::Normal | BulletKind::Double => colors::BULLET,
        BulletKind::Laser => colors::LASER,
        BulletKind::Missile => colors::MISSILE,
    };
    frame.rect(bullet.rect(), color);
}

fn draw_enemy(frame: &mut Frame, enemy: &Enemy, settings: &Settings) {
    let Vec2 { x, y } = enemy.pos;
    let Vec2 { x: w, y: h } = enemy.size;

    match &enemy.kind {
        EnemyKind::Fanship => frame.push(Shape::Polygon {
            points: vec![
                Vec2::new(x + w, y + h / 2.0),
                Vec2::new(x, y + h),
                Vec2::new(x + 8.0, y + h / 2.0),
                Vec2::new(x, y),
            ],
            color: colors::FANSHIP,
        }),
        EnemyKind::Boss(boss) => {
            let flashing = boss.is_dying()
                && !settings.reduced_motion
                && (boss.death_timer() / BOSS_FLASH_TICKS) % 2 == 0;
            let body = if flashing {
                colors::BOSS_FLASH
            } else {
                colors::BOSS
            };
            frame.rect(enemy.rect(), body);
            frame.push(Shape::Circle {
                center: enemy.rect().center(),
                radius: h * 0.2,
                color: colors::BOSS_CORE,
            });

            if !boss.is_dying() {
                let bar = Rect::new(x, y - HP_BAR_GAP, w, HP_BAR_HEIGHT);
                frame.rect(bar, colors::HP_BAR_BG);
                let fill = boss.hp as f32 / boss.max_hp.max(1) as f32;
                frame.rect(Rect::new(x, y - HP_BAR_GAP, w * fill, HP_BAR_HEIGHT), colors::HP_BAR);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{BOSS_DEATH_TICKS, BossPhase};

    fn playing() -> GameState {
        let mut state = GameState::new(5);
        state.start_game();
        state
    }

    fn count_color(frame: &Frame, color: [f32; 4]) -> usize {
        frame
            .shapes
            .iter()
            .filter(|s| match s {
                Shape::Rect { color: c, .. }
                | Shape::Ellipse { color: c, .. }
                | Shape::Circle { color: c, .. }
                | Shape::Ring { color: c, .. }
                | Shape::Polygon { color: c, .. } => *c == color,
            })
            .count()
    }

    #[test]
    fn test_menu_draws_only_stars() {
        let state = GameState::new(5);
        let frame = build_frame(&state, &Settings::default());
        assert_eq!(frame.shapes.len(), state.starfield.stars.len());
    }

    #[test]
    fn test_playing_frame_contents() {
        let mut state = playing();
        state.frame_count = 0;
        state.bullets.push(Bullet::new(Vec2::new(100.0, 100.0), BulletKind::Laser));
        let frame = build_frame(&state, &Settings::default());

        assert_eq!(count_color(&frame, colors::PLAYER), 1);
        assert_eq!(count_color(&frame, colors::ENGINE_FLAME), 1);
        assert_eq!(count_color(&frame, colors::LASER), 1);
        assert!(!frame.vertices().is_empty());

        state.frame_count = 3;
        let frame = build_frame(&state, &Settings::default());
        assert_eq!(count_color(&frame, colors::ENGINE_FLAME), 0);
    }

    #[test]
    fn test_blink_respects_reduced_motion() {
        let mut state = playing();
        state.player.invincible_timer = 5;
        let frame = build_frame(&state, &Settings::default());
        assert_eq!(count_color(&frame, colors::PLAYER), 0);

        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let frame = build_frame(&state, &settings);
        assert_eq!(count_color(&frame, colors::PLAYER), 1);
    }

    #[test]
    fn test_dying_explosion_grows() {
        let mut state = playing();
        state.phase = GamePhase::Dying;
        state.death_timer = PLAYER_DEATH_TICKS;
        let frame = build_frame(&state, &Settings::default());
        assert_eq!(count_color(&frame, colors::PLAYER), 0);
        assert!(!frame.shapes.iter().any(|s| matches!(s, Shape::Circle { .. })));

        state.death_timer = PLAYER_DEATH_TICKS - 10;
        let frame = build_frame(&state, &Settings::default());
        let radii: Vec<f32> = frame
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Circle { radius, .. } => Some(*radius),
                _ => None,
            })
            .collect();
        assert_eq!(radii, vec![20.0, 10.0]);
    }

    #[test]
    fn test_boss_hp_bar_and_flash() {
        let mut state = playing();
        state.spawn_boss();
        let frame = build_frame(&state, &Settings::default());
        assert_eq!(count_color(&frame, colors::HP_BAR), 1);
        assert_eq!(count_color(&frame, colors::BOSS), 1);

        if let Some(EnemyKind::Boss(boss)) = state.enemies.last_mut().map(|e| &mut e.kind) {
            boss.phase = BossPhase::Dying {
                timer: BOSS_DEATH_TICKS,
            };
        }
        let frame = build_frame(&state, &Settings::default());
        assert_eq!(count_color(&frame, colors::HP_BAR), 0);
        assert_eq!(count_color(&frame, colors::BOSS_FLASH), 1);

        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let frame = build_frame(&state, &settings);
        assert_eq!(count_color(&frame, colors::BOSS_FLASH), 0);
    }
}
