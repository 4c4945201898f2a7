//! Enemy spawning, movement and the difficulty ramp
//!
//! Enemies enter from just outside either screen edge and cross the
//! world horizontally. Ground enemies obey gravity and may hop; flying
//! enemies cruise in the upper part of the screen, some on a zigzag.
//! The number allowed alive at once grows on a fixed interval.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use super::collision::fall_and_land;
use super::rect::Rect;
use super::rng::SimRng;
use super::state::Viewport;
use crate::tuning::EnemyTuning;

/// Vertical motion state of a walking enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundMotion {
    pub velocity_y: f32,
    pub grounded: bool,
    pub can_jump: bool,
    /// Sim clock time of the next hop (ms)
    pub next_jump_ms: f64,
}

/// Sine-wave vertical offset for flying enemies
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Zigzag {
    pub amplitude: f32,
    pub frequency: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightPath {
    pub base_y: f32,
    pub start_x: f32,
    pub zigzag: Option<Zigzag>,
    /// Wing animation phase in radians
    pub wing_phase: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EnemyKind {
    Ground(GroundMotion),
    Flying(FlightPath),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub rect: Rect,
    /// Horizontal speed in pixels per frame
    pub speed: f32,
    /// +1 moving right, -1 moving left
    pub direction: f32,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn is_flying(&self) -> bool {
        matches!(self.kind, EnemyKind::Flying(_))
    }

    /// Advance one frame
    fn update<'a>(
        &mut self,
        now_ms: f64,
        ground_top: f32,
        platforms: impl IntoIterator<Item = &'a Rect>,
        tuning: &EnemyTuning,
        rng: &mut SimRng,
    ) {
        self.rect.x += self.speed * self.direction;

        match &mut self.kind {
            EnemyKind::Flying(path) => {
                if let Some(zz) = path.zigzag {
                    let traveled = (self.rect.x - path.start_x).abs();
                    self.rect.y = path.base_y + (traveled * zz.frequency).sin() * zz.amplitude;
                }
                path.wing_phase = (path.wing_phase + tuning.wing_speed) % TAU;
            }
            EnemyKind::Ground(motion) => {
                if motion.can_jump && motion.grounded && now_ms > motion.next_jump_ms {
                    motion.velocity_y = tuning.ground_jump_force;
                    motion.grounded = false;
                    motion.next_jump_ms = now_ms
                        + tuning.jump_interval_min_ms
                        + rng.unit() * tuning.jump_interval_range_ms;
                }

                let landing = fall_and_land(
                    &self.rect,
                    motion.velocity_y,
                    tuning.ground_gravity,
                    ground_top,
                    platforms,
                );
                self.rect.y = landing.y;
                motion.velocity_y = landing.velocity_y;
                motion.grounded = landing.grounded;
            }
        }
    }
}

/// Owns live enemies and the spawn/difficulty timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyManager {
    pub enemies: Vec<Enemy>,
    /// Current number allowed alive at once
    pub max_enemies: u32,
    /// Sim clock time of the last spawn, `None` before the first
    pub last_spawn_ms: Option<f64>,
    /// Sim clock time the cap was last raised (or the run started)
    pub last_increase_ms: f64,
    next_id: u32,
}

impl EnemyManager {
    pub fn new(tuning: &EnemyTuning) -> Self {
        Self {
            enemies: Vec::new(),
            max_enemies: tuning.initial_cap,
            last_spawn_ms: None,
            last_increase_ms: 0.0,
            next_id: 1,
        }
    }

    pub fn reset(&mut self, tuning: &EnemyTuning) {
        *self = Self::new(tuning);
    }

    /// Restart the difficulty clock at the start of a run
    pub fn start(&mut self, now_ms: f64) {
        self.last_increase_ms = now_ms;
    }

    /// Raise the cap once per interval. Returns true if it was raised.
    pub fn increase_cap_if_due(&mut self, now_ms: f64, tuning: &EnemyTuning) -> bool {
        if now_ms - self.last_increase_ms >= tuning.cap_increase_interval_ms {
            self.max_enemies += 1;
            self.last_increase_ms = now_ms;
            log::debug!("Enemy cap raised to {}", self.max_enemies);
            true
        } else {
            false
        }
    }

    /// Spawn one enemy if the cooldown and caps allow it
    ///
    /// `elapsed_ms` is time since the run started; flying enemies unlock
    /// after `flying_after_ms`. Returns the spawned enemy's kind flag
    /// (`Some(true)` for flying).
    pub fn try_spawn(
        &mut self,
        now_ms: f64,
        elapsed_ms: f64,
        camera_x: f32,
        viewport: Viewport,
        tuning: &EnemyTuning,
        rng: &mut SimRng,
    ) -> Option<bool> {
        if let Some(last) = self.last_spawn_ms {
            if now_ms - last < tuning.spawn_cooldown_ms {
                return None;
            }
        }
        let alive = self.enemies.len();
        if alive >= self.max_enemies as usize || alive >= tuning.hard_cap as usize {
            return None;
        }

        self.last_spawn_ms = Some(now_ms);

        let flying = elapsed_ms > tuning.flying_after_ms && rng.chance(tuning.flying_chance);
        let enemy = if flying {
            self.spawn_flying(camera_x, viewport, tuning, rng)
        } else {
            self.spawn_ground(now_ms, camera_x, viewport, tuning, rng)
        };
        self.enemies.push(enemy);
        Some(flying)
    }

    /// Pick a screen edge: (x, direction)
    fn spawn_edge(
        camera_x: f32,
        viewport: Viewport,
        tuning: &EnemyTuning,
        rng: &mut SimRng,
    ) -> (f32, f32) {
        if rng.chance(0.5) {
            (camera_x - tuning.spawn_offset_left, 1.0)
        } else {
            (camera_x + viewport.width + tuning.spawn_offset_right, -1.0)
        }
    }

    fn spawn_ground(
        &mut self,
        now_ms: f64,
        camera_x: f32,
        viewport: Viewport,
        tuning: &EnemyTuning,
        rng: &mut SimRng,
    ) -> Enemy {
        let (x, direction) = Self::spawn_edge(camera_x, viewport, tuning, rng);
        let y = viewport.ground_y() - tuning.size;
        let speed = tuning.ground_min_speed + rng.unit_f32() * tuning.ground_speed_range;
        let can_jump = rng.chance(tuning.jumper_chance);
        let next_jump_ms =
            now_ms + tuning.first_jump_min_ms + rng.unit() * tuning.first_jump_range_ms;

        Enemy {
            id: self.next_entity_id(),
            rect: Rect::new(x, y, tuning.size, tuning.size),
            speed,
            direction,
            kind: EnemyKind::Ground(GroundMotion {
                velocity_y: 0.0,
                grounded: true,
                can_jump,
                next_jump_ms,
            }),
        }
    }

    fn spawn_flying(
        &mut self,
        camera_x: f32,
        viewport: Viewport,
        tuning: &EnemyTuning,
        rng: &mut SimRng,
    ) -> Enemy {
        let (x, direction) = Self::spawn_edge(camera_x, viewport, tuning, rng);
        let min_y = tuning.flying_min_y;
        let max_y = (viewport.ground_y() - tuning.flying_ground_clearance).max(min_y);
        let y = min_y + rng.unit_f32() * (max_y - min_y);
        let speed = tuning.flying_min_speed + rng.unit_f32() * tuning.flying_speed_range;
        let zigzag = rng.chance(tuning.zigzag_chance).then(|| Zigzag {
            amplitude: tuning.zigzag_min_amplitude + rng.unit_f32() * tuning.zigzag_amplitude_range,
            frequency: tuning.zigzag_min_frequency + rng.unit_f32() * tuning.zigzag_frequency_range,
        });

        Enemy {
            id: self.next_entity_id(),
            rect: Rect::new(x, y, tuning.size, tuning.size),
            speed,
            direction,
            kind: EnemyKind::Flying(FlightPath {
                base_y: y,
                start_x: x,
                zigzag,
                wing_phase: 0.0,
            }),
        }
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Move all enemies and despawn the ones that wandered off
    ///
    /// Returns the number of enemies removed.
    pub fn update(
        &mut self,
        now_ms: f64,
        camera_x: f32,
        viewport: Viewport,
        platforms: &[Rect],
        tuning: &EnemyTuning,
        rng: &mut SimRng,
    ) -> usize {
        let view_center = Rect::new(camera_x, 0.0, viewport.width, viewport.height).center();
        let before = self.enemies.len();

        // Over the hard cap: evict the farthest first
        while self.enemies.len() > tuning.hard_cap as usize {
            let farthest = self
                .enemies
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| {
                    let da = (a.rect.x - view_center.x).abs();
                    let db = (b.rect.x - view_center.x).abs();
                    da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|(i, _)| i);
            match farthest {
                Some(i) => {
                    self.enemies.remove(i);
                }
                None => break,
            }
        }

        let ground_top = viewport.ground_y();
        for enemy in &mut self.enemies {
            enemy.update(now_ms, ground_top, platforms, tuning, rng);
        }

        let max_distance = viewport.width * tuning.despawn_widths;
        self.enemies
            .retain(|e| (e.rect.x - view_center.x).abs() <= max_distance);

        before - self.enemies.len()
    }

    /// First enemy overlapping `target`, if any
    pub fn hits(&self, target: &Rect) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.rect.overlaps(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport {
        width: 1280.0,
        height: 720.0,
    };

    fn setup() -> (EnemyManager, EnemyTuning, SimRng) {
        let tuning = EnemyTuning::default();
        (EnemyManager::new(&tuning), tuning, SimRng::new(42))
    }

    #[test]
    fn test_first_spawn_is_immediate() {
        let (mut mgr, tuning, mut rng) = setup();
        assert_eq!(
            mgr.try_spawn(0.0, 0.0, 0.0, VIEW, &tuning, &mut rng),
            Some(false)
        );
        assert_eq!(mgr.enemies.len(), 1);
    }

    #[test]
    fn test_cap_blocks_spawn() {
        let (mut mgr, tuning, mut rng) = setup();
        mgr.try_spawn(0.0, 0.0, 0.0, VIEW, &tuning, &mut rng);
        // Cooldown passed, but cap is 1
        assert_eq!(
            mgr.try_spawn(5000.0, 5000.0, 0.0, VIEW, &tuning, &mut rng),
            None
        );
        mgr.max_enemies = 2;
        assert!(mgr.try_spawn(5000.0, 5000.0, 0.0, VIEW, &tuning, &mut rng).is_some());
    }

    #[test]
    fn test_cooldown_blocks_spawn() {
        let (mut mgr, tuning, mut rng) = setup();
        mgr.max_enemies = 10;
        mgr.try_spawn(1000.0, 0.0, 0.0, VIEW, &tuning, &mut rng);
        assert_eq!(
            mgr.try_spawn(1500.0, 500.0, 0.0, VIEW, &tuning, &mut rng),
            None
        );
        assert!(mgr.try_spawn(2000.0, 1000.0, 0.0, VIEW, &tuning, &mut rng).is_some());
    }

    #[test]
    fn test_no_flying_before_unlock() {
        let tuning = EnemyTuning {
            flying_chance: 1.0,
            ..Default::default()
        };
        let mut mgr = EnemyManager::new(&tuning);
        let mut rng = SimRng::new(1);
        mgr.max_enemies = 10;
        assert_eq!(
            mgr.try_spawn(0.0, 9_000.0, 0.0, VIEW, &tuning, &mut rng),
            Some(false)
        );
        assert_eq!(
            mgr.try_spawn(2000.0, 11_000.0, 0.0, VIEW, &tuning, &mut rng),
            Some(true)
        );
        let flyer = &mgr.enemies[1];
        assert!(flyer.is_flying());
        assert!(flyer.rect.y >= tuning.flying_min_y);
        assert!(flyer.rect.y <= VIEW.ground_y() - tuning.flying_ground_clearance);
    }

    #[test]
    fn test_spawns_off_screen_heading_inward() {
        let (mut mgr, tuning, mut rng) = setup();
        mgr.max_enemies = 50;
        let camera_x = 300.0;
        for i in 0..20 {
            let now = i as f64 * 1000.0;
            mgr.try_spawn(now, now, camera_x, VIEW, &tuning, &mut rng);
        }
        for enemy in &mgr.enemies {
            if enemy.direction > 0.0 {
                assert_eq!(enemy.rect.x, camera_x - tuning.spawn_offset_left);
            } else {
                assert_eq!(
                    enemy.rect.x,
                    camera_x + VIEW.width + tuning.spawn_offset_right
                );
            }
        }
    }

    #[test]
    fn test_cap_ramp() {
        let (mut mgr, tuning, _) = setup();
        mgr.start(1000.0);
        assert!(!mgr.increase_cap_if_due(5999.0, &tuning));
        assert!(mgr.increase_cap_if_due(6000.0, &tuning));
        assert_eq!(mgr.max_enemies, 2);
        assert!(!mgr.increase_cap_if_due(7000.0, &tuning));
        assert!(mgr.increase_cap_if_due(11_000.0, &tuning));
        assert_eq!(mgr.max_enemies, 3);
    }

    #[test]
    fn test_ground_enemy_walks_and_stays_grounded() {
        let (mut mgr, tuning, mut rng) = setup();
        let enemy = mgr.spawn_ground(0.0, 0.0, VIEW, &tuning, &mut rng);
        mgr.enemies.push(Enemy {
            kind: EnemyKind::Ground(GroundMotion {
                velocity_y: 0.0,
                grounded: true,
                can_jump: false,
                next_jump_ms: 0.0,
            }),
            ..enemy
        });
        let x0 = mgr.enemies[0].rect.x;
        mgr.update(16.0, 0.0, VIEW, &[], &tuning, &mut rng);
        let e = &mgr.enemies[0];
        assert_eq!(e.rect.x, x0 + e.speed * e.direction);
        assert_eq!(e.rect.bottom(), VIEW.ground_y());
    }

    #[test]
    fn test_jumper_hops_when_due() {
        let (mut mgr, tuning, mut rng) = setup();
        mgr.enemies.push(Enemy {
            id: 1,
            rect: Rect::new(600.0, VIEW.ground_y() - 40.0, 40.0, 40.0),
            speed: 3.0,
            direction: 1.0,
            kind: EnemyKind::Ground(GroundMotion {
                velocity_y: 0.0,
                grounded: true,
                can_jump: true,
                next_jump_ms: 100.0,
            }),
        });
        mgr.update(50.0, 0.0, VIEW, &[], &tuning, &mut rng);
        assert_eq!(mgr.enemies[0].rect.bottom(), VIEW.ground_y());

        mgr.update(150.0, 0.0, VIEW, &[], &tuning, &mut rng);
        let EnemyKind::Ground(motion) = &mgr.enemies[0].kind else {
            panic!("expected ground enemy");
        };
        assert!(motion.velocity_y < 0.0);
        assert!(!motion.grounded);
        assert!(motion.next_jump_ms >= 150.0 + tuning.jump_interval_min_ms);
    }

    #[test]
    fn test_zigzag_follows_sine() {
        let (mut mgr, tuning, mut rng) = setup();
        mgr.enemies.push(Enemy {
            id: 1,
            rect: Rect::new(500.0, 200.0, 40.0, 40.0),
            speed: 5.0,
            direction: 1.0,
            kind: EnemyKind::Flying(FlightPath {
                base_y: 200.0,
                start_x: 500.0,
                zigzag: Some(Zigzag {
                    amplitude: 50.0,
                    frequency: 0.015,
                }),
                wing_phase: 0.0,
            }),
        });
        for _ in 0..20 {
            mgr.update(0.0, 0.0, VIEW, &[], &tuning, &mut rng);
        }
        let e = &mgr.enemies[0];
        let expected = 200.0 + (100.0f32 * 0.015).sin() * 50.0;
        assert!((e.rect.y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_despawn_far_from_camera() {
        let (mut mgr, tuning, mut rng) = setup();
        mgr.max_enemies = 5;
        mgr.try_spawn(0.0, 0.0, 0.0, VIEW, &tuning, &mut rng);
        // Camera races away
        let removed = mgr.update(16.0, 10_000.0, VIEW, &[], &tuning, &mut rng);
        assert_eq!(removed, 1);
        assert!(mgr.enemies.is_empty());
    }

    #[test]
    fn test_despawn_measured_from_view_centre() {
        let (mut mgr, tuning, mut rng) = setup();
        // Centre at 640, limit 1.5 widths = 1920
        for (id, x) in [(1, 2550.0), (2, 2570.0), (3, -1270.0), (4, -1290.0)] {
            mgr.enemies.push(Enemy {
                id,
                rect: Rect::new(x, 100.0, 40.0, 40.0),
                speed: 0.0,
                direction: 1.0,
                kind: EnemyKind::Flying(FlightPath {
                    base_y: 100.0,
                    start_x: x,
                    zigzag: None,
                    wing_phase: 0.0,
                }),
            });
        }
        let removed = mgr.update(0.0, 0.0, VIEW, &[], &tuning, &mut rng);
        assert_eq!(removed, 2);
        let ids: Vec<u32> = mgr.enemies.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_hard_cap_evicts_farthest() {
        let tuning = EnemyTuning {
            hard_cap: 2,
            ..Default::default()
        };
        let mut mgr = EnemyManager::new(&tuning);
        let mut rng = SimRng::new(3);
        for (id, x) in [(1, 640.0), (2, 1500.0), (3, 700.0)] {
            mgr.enemies.push(Enemy {
                id,
                rect: Rect::new(x, 100.0, 40.0, 40.0),
                speed: 0.0,
                direction: 1.0,
                kind: EnemyKind::Flying(FlightPath {
                    base_y: 100.0,
                    start_x: x,
                    zigzag: None,
                    wing_phase: 0.0,
                }),
            });
        }
        mgr.update(0.0, 0.0, VIEW, &[], &tuning, &mut rng);
        let ids: Vec<u32> = mgr.enemies.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_hits() {
        let (mut mgr, tuning, mut rng) = setup();
        mgr.try_spawn(0.0, 0.0, 0.0, VIEW, &tuning, &mut rng);
        let enemy_rect = mgr.enemies[0].rect;
        assert!(mgr.hits(&enemy_rect).is_some());
        let elsewhere = Rect::new(enemy_rect.x + 500.0, 0.0, 40.0, 40.0);
        assert!(mgr.hits(&elsewhere).is_none());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn enemy_count_respects_caps(seed in any::<u64>(), frames in 100usize..2000) {
                let tuning = EnemyTuning::default();
                let mut mgr = EnemyManager::new(&tuning);
                let mut rng = SimRng::new(seed);
                mgr.start(0.0);
                for frame in 0..frames {
                    let now = frame as f64 * crate::consts::FRAME_MS;
                    mgr.increase_cap_if_due(now, &tuning);
                    mgr.try_spawn(now, now, 0.0, VIEW, &tuning, &mut rng);
                    prop_assert!(mgr.enemies.len() <= mgr.max_enemies as usize);
                    mgr.update(now, 0.0, VIEW, &[], &tuning, &mut rng);
                    prop_assert!(mgr.enemies.len() <= tuning.hard_cap as usize);
                }
            }
        }
    }
}
