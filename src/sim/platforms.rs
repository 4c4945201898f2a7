//! Procedural floating platforms
//!
//! The world is cut into fixed-width chunks. Each chunk's platforms are a
//! pure function of (chunk index, world seed), generated when the player
//! comes near and forgotten once the player is far away. Platforms the
//! player stands on too long fade out and are gone for good.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::collision::standing_on;
use super::rect::Rect;
use super::rng::seeded_random;
use crate::tuning::PlatformTuning;

/// A floating platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    /// Time the player has stood on it without leaving (ms)
    pub standing_ms: f64,
    /// Time since fading began (ms), `None` while solid
    pub fade_elapsed_ms: Option<f64>,
    /// 1.0 = solid, 0.0 = gone
    pub opacity: f32,
}

impl Platform {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            standing_ms: 0.0,
            fade_elapsed_ms: None,
            opacity: 1.0,
        }
    }

    pub fn is_fading(&self) -> bool {
        self.fade_elapsed_ms.is_some()
    }
}

/// Chunk index containing world x
pub fn chunk_of(x: f32, chunk_size: f32) -> i64 {
    (x / chunk_size).floor() as i64
}

/// Lay out the candidate platforms for one chunk
///
/// Pure: the same chunk and world seed always yield the same rectangles.
pub fn chunk_layout(
    chunk: i64,
    ground_top: f32,
    world_seed: u64,
    tuning: &PlatformTuning,
) -> Vec<Rect> {
    let chunk_start = chunk as f32 * tuning.chunk_size;
    (0..tuning.platforms_per_chunk as i64)
        .map(|i| {
            let seed = chunk * 1000 + i;
            let r_width = seeded_random(seed, world_seed) as f32;
            let r_x = seeded_random(seed + 1, world_seed) as f32;
            let r_y = seeded_random(seed + 2, world_seed) as f32;

            let width = tuning.min_width + r_width * tuning.width_range;
            let free = tuning.chunk_size - 2.0 * tuning.chunk_margin - width;
            let x = chunk_start + tuning.chunk_margin + r_x * free;
            let y = ground_top - tuning.min_rise - r_y * tuning.rise_range;
            Rect::new(x, y, width, tuning.height)
        })
        .collect()
}

/// All live platforms plus the set of chunks already generated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformField {
    pub platforms: Vec<Platform>,
    pub chunks: BTreeSet<i64>,
    /// Chunk the player was in at the last update (drives culling)
    #[serde(skip)]
    last_chunk: Option<i64>,
}

impl PlatformField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.platforms.clear();
        self.chunks.clear();
        self.last_chunk = None;
    }

    /// Platform rectangles, for collision
    pub fn rects(&self) -> impl Iterator<Item = &Rect> {
        self.platforms.iter().map(|p| &p.rect)
    }

    /// Generate a chunk once. Candidates that crowd an existing platform are dropped.
    pub fn generate_chunk(
        &mut self,
        chunk: i64,
        ground_top: f32,
        world_seed: u64,
        tuning: &PlatformTuning,
    ) {
        if !self.chunks.insert(chunk) {
            return;
        }

        let mut added = 0;
        for rect in chunk_layout(chunk, ground_top, world_seed, tuning) {
            let crowded = self
                .platforms
                .iter()
                .any(|p| p.rect.overlaps_with_gap(&rect, tuning.min_gap));
            if !crowded {
                self.platforms.push(Platform::new(rect));
                added += 1;
            }
        }
        log::debug!("Generated chunk {chunk}: {added} platforms");
    }

    /// Generate chunks around the player and reclaim far ones
    pub fn update_around(
        &mut self,
        player_x: f32,
        ground_top: f32,
        world_seed: u64,
        tuning: &PlatformTuning,
    ) {
        let current = chunk_of(player_x, tuning.chunk_size);
        for chunk in (current - tuning.generate_radius)..=(current + tuning.generate_radius) {
            self.generate_chunk(chunk, ground_top, world_seed, tuning);
        }

        if self.last_chunk != Some(current) {
            if self.last_chunk.is_some() {
                self.cleanup(player_x, tuning);
            }
            self.last_chunk = Some(current);
        }
    }

    /// Drop platforms far from the player and forget distant chunks
    ///
    /// A chunk that lost any platform is forgotten too, so it is rebuilt
    /// from the seed when the player comes back.
    pub fn cleanup(&mut self, player_x: f32, tuning: &PlatformTuning) {
        let cull_distance = tuning.chunk_size * tuning.cull_chunks;
        let mut culled = BTreeSet::new();
        self.platforms.retain(|p| {
            let keep = (p.rect.x - player_x).abs() <= cull_distance;
            if !keep {
                culled.insert(chunk_of(p.rect.x, tuning.chunk_size));
            }
            keep
        });

        let current = chunk_of(player_x, tuning.chunk_size);
        self.chunks.retain(|chunk| {
            (chunk - current).abs() <= tuning.forget_radius && !culled.contains(chunk)
        });
    }

    /// Advance platform decay for one frame
    ///
    /// Returns the number of platforms that finished fading and were removed.
    pub fn update_stability(
        &mut self,
        player: &Rect,
        player_velocity_y: f32,
        dt_ms: f64,
        tuning: &PlatformTuning,
    ) -> usize {
        for platform in &mut self.platforms {
            let standing = standing_on(
                player,
                player_velocity_y,
                &platform.rect,
                tuning.standing_tolerance,
            );

            if let Some(elapsed) = platform.fade_elapsed_ms.as_mut() {
                *elapsed += dt_ms;
            } else if standing {
                platform.standing_ms += dt_ms;
                if platform.standing_ms >= tuning.stand_before_fade_ms {
                    platform.fade_elapsed_ms = Some(0.0);
                }
            } else {
                platform.standing_ms = 0.0;
            }

            if let Some(elapsed) = platform.fade_elapsed_ms {
                let progress = elapsed / tuning.fade_duration_ms;
                platform.opacity = (1.0 - progress).max(0.0) as f32;
            }
        }

        let before = self.platforms.len();
        self.platforms
            .retain(|p| !(p.is_fading() && p.opacity <= 0.0));
        before - self.platforms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;

    const GROUND: f32 = 540.0;
    const SEED: u64 = 1_700_000_123_456;

    fn standing_player(platform: &Rect) -> Rect {
        Rect::new(platform.x + 5.0, platform.y - 40.0, 40.0, 40.0)
    }

    #[test]
    fn test_chunk_of() {
        assert_eq!(chunk_of(0.0, 800.0), 0);
        assert_eq!(chunk_of(799.0, 800.0), 0);
        assert_eq!(chunk_of(800.0, 800.0), 1);
        assert_eq!(chunk_of(-1.0, 800.0), -1);
    }

    #[test]
    fn test_layout_stays_inside_chunk() {
        let tuning = PlatformTuning::default();
        for chunk in -5..5 {
            for rect in chunk_layout(chunk, GROUND, SEED, &tuning) {
                let start = chunk as f32 * tuning.chunk_size;
                assert!(rect.x >= start + tuning.chunk_margin - 0.01);
                assert!(rect.right() <= start + tuning.chunk_size - tuning.chunk_margin + 0.01);
                assert!(rect.y <= GROUND - tuning.min_rise);
                assert!(rect.y >= GROUND - tuning.min_rise - tuning.rise_range);
                assert!(rect.width >= tuning.min_width);
            }
        }
    }

    #[test]
    fn test_generate_chunk_once() {
        let tuning = PlatformTuning::default();
        let mut field = PlatformField::new();
        field.generate_chunk(3, GROUND, SEED, &tuning);
        let count = field.platforms.len();
        assert!(count >= 1 && count <= tuning.platforms_per_chunk as usize);

        field.generate_chunk(3, GROUND, SEED, &tuning);
        assert_eq!(field.platforms.len(), count);
    }

    #[test]
    fn test_same_seed_same_world() {
        let tuning = PlatformTuning::default();
        let mut a = PlatformField::new();
        let mut b = PlatformField::new();
        a.update_around(1234.0, GROUND, SEED, &tuning);
        b.update_around(1234.0, GROUND, SEED, &tuning);
        let ra: Vec<Rect> = a.rects().copied().collect();
        let rb: Vec<Rect> = b.rects().copied().collect();
        assert_eq!(ra, rb);
    }

    #[test]
    fn test_update_around_generates_neighbourhood() {
        let tuning = PlatformTuning::default();
        let mut field = PlatformField::new();
        field.update_around(100.0, GROUND, SEED, &tuning);
        let expected: BTreeSet<i64> = (-2..=2).collect();
        assert_eq!(field.chunks, expected);
    }

    #[test]
    fn test_cleanup_when_player_moves_on() {
        let tuning = PlatformTuning::default();
        let mut field = PlatformField::new();
        field.update_around(100.0, GROUND, SEED, &tuning);

        // Walk far to the right, one chunk at a time
        let mut x = 100.0;
        while x < 8000.0 {
            x += tuning.chunk_size;
            field.update_around(x, GROUND, SEED, &tuning);
        }

        let current = chunk_of(x, tuning.chunk_size);
        assert!(field.chunks.iter().all(|c| (c - current).abs() <= tuning.forget_radius));
        let cull = tuning.chunk_size * tuning.cull_chunks;
        assert!(field.platforms.iter().all(|p| (p.rect.x - x).abs() <= cull));
    }

    #[test]
    fn test_backtracking_regenerates_culled_chunks() {
        let tuning = PlatformTuning::default();
        let mut field = PlatformField::new();
        let mut x = 100.0;
        field.update_around(x, GROUND, SEED, &tuning);
        for _ in 0..8 {
            x += tuning.chunk_size;
            field.update_around(x, GROUND, SEED, &tuning);
        }
        for _ in 0..4 {
            x -= tuning.chunk_size;
            field.update_around(x, GROUND, SEED, &tuning);
        }

        let current = chunk_of(x, tuning.chunk_size);
        for chunk in (current - tuning.generate_radius)..=(current + tuning.generate_radius) {
            let count = field
                .platforms
                .iter()
                .filter(|p| chunk_of(p.rect.x, tuning.chunk_size) == chunk)
                .count();
            assert!(count > 0, "chunk {chunk} is empty");
        }

        // Regenerated layout matches a fresh walk to the same spot
        let mut fresh = PlatformField::new();
        fresh.generate_chunk(current, GROUND, SEED, &tuning);
        let in_current: Vec<Rect> = field
            .rects()
            .filter(|r| chunk_of(r.x, tuning.chunk_size) == current)
            .copied()
            .collect();
        let mut expected: Vec<Rect> = fresh.rects().copied().collect();
        let mut actual = in_current;
        let by_x = |a: &Rect, b: &Rect| a.x.total_cmp(&b.x);
        expected.sort_by(by_x);
        actual.sort_by(by_x);
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_platform_fades_after_standing() {
        let tuning = PlatformTuning::default();
        let mut field = PlatformField::new();
        let rect = Rect::new(100.0, 300.0, 120.0, 20.0);
        field.platforms.push(Platform::new(rect));
        let player = standing_player(&rect);

        // Just under the threshold: still solid
        for _ in 0..7 {
            field.update_stability(&player, 0.0, 250.0, &tuning);
        }
        assert!(!field.platforms[0].is_fading());

        field.update_stability(&player, 0.0, 250.0, &tuning);
        assert!(field.platforms[0].is_fading());
        assert_eq!(field.platforms[0].opacity, 1.0);

        // Fade continues even after the player leaves
        let away = Rect::new(1000.0, 0.0, 40.0, 40.0);
        let mut removed = 0;
        for _ in 0..3 {
            removed += field.update_stability(&away, 0.0, 250.0, &tuning);
        }
        assert_eq!(removed, 0);
        removed += field.update_stability(&away, 0.0, 250.0, &tuning);
        assert_eq!(removed, 1);
        assert!(field.platforms.is_empty());
    }

    #[test]
    fn test_opacity_decreases_while_fading() {
        let tuning = PlatformTuning::default();
        let mut field = PlatformField::new();
        let rect = Rect::new(100.0, 300.0, 120.0, 20.0);
        let mut platform = Platform::new(rect);
        platform.fade_elapsed_ms = Some(0.0);
        field.platforms.push(platform);

        let away = Rect::new(1000.0, 0.0, 40.0, 40.0);
        field.update_stability(&away, 0.0, 500.0, &tuning);
        assert!((field.platforms[0].opacity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_leaving_resets_standing_time() {
        let tuning = PlatformTuning::default();
        let mut field = PlatformField::new();
        let rect = Rect::new(100.0, 300.0, 120.0, 20.0);
        field.platforms.push(Platform::new(rect));
        let player = standing_player(&rect);

        field.update_stability(&player, 0.0, 1500.0, &tuning);
        assert_eq!(field.platforms[0].standing_ms, 1500.0);

        // A jump (rising) breaks the streak
        field.update_stability(&player, -10.0, FRAME_MS, &tuning);
        assert_eq!(field.platforms[0].standing_ms, 0.0);

        field.update_stability(&player, 0.0, 1500.0, &tuning);
        assert!(!field.platforms[0].is_fading());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn generated_platforms_never_crowd(
                world_seed in 0u64..2_000_000_000_000,
                start_chunk in -50i64..50,
                steps in 1usize..12,
            ) {
                let tuning = PlatformTuning::default();
                let mut field = PlatformField::new();
                for step in 0..steps {
                    let x = (start_chunk + step as i64) as f32 * tuning.chunk_size + 10.0;
                    field.update_around(x, GROUND, world_seed, &tuning);
                }
                let rects: Vec<Rect> = field.rects().copied().collect();
                for (i, a) in rects.iter().enumerate() {
                    for b in &rects[i + 1..] {
                        prop_assert!(!a.overlaps_with_gap(b, tuning.min_gap), "{a:?} crowds {b:?}");
                    }
                }
            }
        }
    }
}
