//! Leaderboard tables - dedupe by player, keep the best, cap the length

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::collaborators::ScoreStore;
use super::error::Result;

/// Entries kept per game
pub const LEADERBOARD_SIZE: usize = 30;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: i64,
}

/// Comparison key for player names: trimmed, lowercase
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Insert a score into a table, returning the new table.
///
/// One entry per normalized name (highest score wins, ties keep the
/// existing entry), sorted best first, truncated to `LEADERBOARD_SIZE`.
pub fn insert_score(mut table: Vec<ScoreEntry>, name: &str, score: i64) -> Vec<ScoreEntry> {
    let display = name.trim();
    let display = if display.is_empty() { "Player" } else { display };
    let key = normalize_name(display);

    match table.iter_mut().find(|e| normalize_name(&e.name) == key) {
        Some(existing) if existing.score >= score => {}
        Some(existing) => {
            existing.score = score;
            existing.name = display.to_string();
        }
        None => table.push(ScoreEntry { name: display.to_string(), score }),
    }

    // Older tables may carry duplicates; keep the first (best after sort)
    table.sort_by(|a, b| b.score.cmp(&a.score));
    let mut seen = hashbrown::HashSet::new();
    table.retain(|e| seen.insert(normalize_name(&e.name)));
    table.truncate(LEADERBOARD_SIZE);
    table
}

/// In-memory store, isolated per game id
#[derive(Default)]
pub struct MemoryScoreStore {
    tables: HashMap<String, Vec<ScoreEntry>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn save_score(&mut self, game_id: &str, name: &str, score: i64) -> Result<()> {
        let table = self.tables.remove(game_id).unwrap_or_default();
        self.tables.insert(game_id.to_string(), insert_score(table, name, score));
        Ok(())
    }

    fn load_scores(&self, game_id: &str) -> Result<Vec<ScoreEntry>> {
        Ok(self.tables.get(game_id).cloned().unwrap_or_default())
    }
}
