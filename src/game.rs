use std::collections::HashMap;

/// Genre -> score map produced by the mini-game (items collected per
/// genre). The rendering loop itself lives outside the core.
pub type GameResults = HashMap<String, u32>;

/// Hooks into the external mini-game loop. Entering the game tab starts
/// it, leaving the tab (or logging out) stops it.
pub trait GameHooks: Send + Sync {
    fn start(&self);
    fn stop(&self);
}

/// Default hooks for headless use.
#[derive(Debug, Default)]
pub struct NoopGame;

impl GameHooks for NoopGame {
    fn start(&self) {}
    fn stop(&self) {}
}

/// The genre with the highest score. Ties break lexicographically so the
/// outcome is deterministic regardless of map iteration order.
pub fn dominant_genre(results: &GameResults) -> Option<&str> {
    results
        .iter()
        .max_by(|(ga, sa), (gb, sb)| sa.cmp(sb).then_with(|| gb.cmp(ga)))
        .map(|(genre, _)| genre.as_str())
}
