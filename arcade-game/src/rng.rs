//! Uniform draws and shuffles backed by deterministic, reseedable streams.
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use sha2::Sha256;

use crate::error::GameError;
use crate::outcome::GameKind;

/// Counting wrapper around a small RNG; every game draw goes through here.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: SmallRng,
    draws: u64,
}

impl RandomSource {
    /// Deterministic source for a given seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }

    /// Source seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
            draws: 0,
        }
    }

    /// Restart the stream from `seed`, clearing the draw counter.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::from_seed(seed);
    }

    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    /// Uniform integer in `[min, max]`, both ends inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidRange`] when `min > max`.
    pub fn draw_int(&mut self, min: i64, max: i64) -> Result<i64, GameError> {
        if min > max {
            return Err(GameError::InvalidRange { min, max });
        }
        Ok(self.gen_range(min..=max))
    }

    /// Uniformly permuted copy of `items`; the input is left untouched.
    #[must_use]
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut shuffled = items.to_vec();
        shuffled.shuffle(self);
        shuffled
    }

    /// Uniformly chosen element, or `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(self)
    }
}

impl RngCore for RandomSource {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

/// One independent stream per game, all derived from a single user seed so
/// that playing one game never shifts the draws of another.
#[derive(Debug, Clone)]
pub struct RngBundle {
    seed: u64,
    streams: [RandomSource; GameKind::ALL.len()],
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        let streams = GameKind::ALL.map(|kind| {
            RandomSource::from_seed(derive_stream_seed(seed, kind.as_str().as_bytes()))
        });
        Self { seed, streams }
    }

    /// Bundle seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::from_user_seed(RandomSource::from_entropy().next_u64())
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Access the stream owned by `kind`.
    pub fn stream(&mut self, kind: GameKind) -> &mut RandomSource {
        &mut self.streams[kind as usize]
    }

    /// Deterministically reseed every stream.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::from_user_seed(seed);
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_int_rejects_inverted_range() {
        let mut rng = RandomSource::from_seed(1);
        assert_eq!(
            rng.draw_int(5, 4),
            Err(GameError::InvalidRange { min: 5, max: 4 })
        );
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn draw_int_accepts_single_value_range() {
        let mut rng = RandomSource::from_seed(1);
        assert_eq!(rng.draw_int(7, 7), Ok(7));
    }

    #[test]
    fn shuffle_keeps_input_and_permutes_copy() {
        let mut rng = RandomSource::from_seed(99);
        let items: Vec<u32> = (0..20).collect();
        let shuffled = rng.shuffle(&items);
        assert_eq!(items, (0..20).collect::<Vec<_>>());
        let mut sorted = shuffled.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, items);
    }

    #[test]
    fn reseed_replays_the_same_sequence() {
        let mut rng = RandomSource::from_seed(4242);
        let first: Vec<i64> = (0..8).map(|_| rng.draw_int(1, 100).unwrap()).collect();
        rng.reseed(4242);
        let second: Vec<i64> = (0..8).map(|_| rng.draw_int(1, 100).unwrap()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn bundle_streams_are_independent() {
        let mut a = RngBundle::from_user_seed(7);
        let mut b = RngBundle::from_user_seed(7);
        // Burn draws on one stream only; the other must stay in lockstep.
        for _ in 0..5 {
            let _ = a.stream(GameKind::Memory).draw_int(0, 10);
        }
        let left = a.stream(GameKind::NumberGuess).draw_int(1, 1_000_000).unwrap();
        let right = b.stream(GameKind::NumberGuess).draw_int(1, 1_000_000).unwrap();
        assert_eq!(left, right);
        assert_eq!(a.stream(GameKind::NumberGuess).draws(), 1);
    }

    #[test]
    fn pick_handles_empty_slices() {
        let mut rng = RandomSource::from_seed(3);
        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());
        assert!(rng.pick(&[1, 2, 3]).is_some());
    }
}
