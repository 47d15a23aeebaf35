//! Scripted random source for deterministic tests.

use lettuce_park_core::RandomSource;

/// Random source that replays a fixed list of unit draws.
///
/// Draws are consumed in order; once the list is exhausted it cycles from the
/// start. An empty script always yields `0.0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    draws: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    /// Replay `draws` (each clamped into `[0, 1)`).
    pub fn new(draws: impl Into<Vec<f32>>) -> Self {
        let draws = draws
            .into()
            .into_iter()
            .map(|d| d.clamp(0.0, 0.999_999))
            .collect();
        Self { draws, cursor: 0 }
    }

    /// Source that always yields the same draw.
    pub fn constant(draw: f32) -> Self {
        Self::new(vec![draw])
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        if self.draws.is_empty() {
            self.cursor += 1;
            return 0.0;
        }
        let draw = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        draw
    }
}
