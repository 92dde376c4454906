use serde::Serialize;
use std::cmp::Ordering;

use super::RankValue;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankEntry<V> {
    pub player_key: String,
    pub value: V,
}

impl<V> RankEntry<V> {
    pub fn new(player_key: impl Into<String>, value: V) -> Self {
        Self {
            player_key: player_key.into(),
            value,
        }
    }
}

/// An entry with its 1-based position in the descending ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry<V> {
    pub rank: usize,
    pub player_key: String,
    pub value: V,
}

impl<V> RankedEntry<V> {
    pub fn map_value<W>(self, f: impl FnOnce(V) -> W) -> RankedEntry<W> {
        RankedEntry {
            rank: self.rank,
            player_key: self.player_key,
            value: f(self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbors<V> {
    /// Closest player strictly below the target
    pub lower: Option<RankedEntry<V>>,
    /// Closest player at or above the target
    pub upper: Option<RankedEntry<V>>,
    pub target_rank: Option<usize>,
}

impl<V> Neighbors<V> {
    pub fn map_values<W>(self, f: impl Fn(V) -> W) -> Neighbors<W> {
        Neighbors {
            lower: self.lower.map(|entry| entry.map_value(&f)),
            upper: self.upper.map(|entry| entry.map_value(&f)),
            target_rank: self.target_rank,
        }
    }
}

pub struct RankingInterpolator;

impl RankingInterpolator {
    /// Sorts `snapshot` descending (stable, so ties keep input order) and
    /// assigns ranks starting at 1.
    pub fn rank<V: RankValue>(snapshot: &[RankEntry<V>]) -> Vec<RankedEntry<V>> {
        let mut sorted: Vec<&RankEntry<V>> = snapshot.iter().collect();
        sorted.sort_by(|a, b| b.value.rank_cmp(&a.value));

        sorted
            .into_iter()
            .enumerate()
            .map(|(index, entry)| RankedEntry {
                rank: index + 1,
                player_key: entry.player_key.clone(),
                value: entry.value.clone(),
            })
            .collect()
    }

    /// Players immediately above and below `target_value`.
    ///
    /// Walking the ranking from the top, every other player at or above the
    /// target replaces `upper`; the first one strictly below becomes `lower`
    /// and ends the walk. Ties with the target count as upper.
    pub fn find_neighbors<V: RankValue>(
        snapshot: &[RankEntry<V>],
        target_key: &str,
        target_value: &V,
    ) -> Neighbors<V> {
        let ranked = Self::rank(snapshot);
        let target_rank = ranked
            .iter()
            .find(|entry| entry.player_key == target_key)
            .map(|entry| entry.rank);

        let mut upper = None;
        let mut lower = None;
        for entry in ranked.iter().filter(|entry| entry.player_key != target_key) {
            if entry.value.rank_cmp(target_value) == Ordering::Less {
                lower = Some(entry.clone());
                break;
            }
            upper = Some(entry.clone());
        }

        Neighbors {
            lower,
            upper,
            target_rank,
        }
    }
}
