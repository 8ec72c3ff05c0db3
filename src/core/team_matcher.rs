//! Loose team-name matching against the names a score source reports.
//!
//! A fragment identifies a team when it appears inside the candidate name, or
//! when the two strings' similarity ratio is above the threshold. The ratio is
//! the longest-matching-blocks measure: `2 * M / (len(a) + len(b))`, where `M`
//! is the number of characters covered by recursively taking the longest
//! common contiguous block and repeating on both sides of it.

use crate::domain::model::GameRecord;
use std::collections::{HashMap, HashSet};

pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Candidates at least this long get the "popular character" heuristic.
const AUTOJUNK_MIN_LEN: usize = 200;

#[derive(Debug, Clone, Copy)]
pub struct TeamMatcher {
    threshold: f64,
}

impl Default for TeamMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl TeamMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Does `fragment` identify `candidate`? Containment is only checked one
    /// way: the fragment inside the candidate.
    pub fn accepts(&self, fragment: &str, candidate: &str) -> bool {
        let fragment = fragment.trim().to_lowercase();
        let candidate = candidate.to_lowercase();
        candidate.contains(&fragment) || similarity_ratio(&fragment, &candidate) > self.threshold
    }

    fn accepts_either(&self, fragment: &str, game: &GameRecord) -> bool {
        self.accepts(fragment, &game.home) || self.accepts(fragment, &game.away)
    }

    /// Games where `team1`, and `team2` when given, each match the home or the
    /// away side. Both fragments may match the same side. Input order is kept.
    pub fn find_team_game(
        &self,
        games: Vec<GameRecord>,
        team1: &str,
        team2: Option<&str>,
    ) -> Vec<GameRecord> {
        games
            .into_iter()
            .filter(|game| {
                self.accepts_either(team1, game)
                    && team2.map_or(true, |team2| self.accepts_either(team2, game))
            })
            .collect()
    }
}

/// Similarity of two strings in `0.0..=1.0`, after trimming and lower-casing.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.trim().to_lowercase().chars().collect();
    let b: Vec<char> = b.trim().to_lowercase().chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matches: usize = BlockMatcher::new(&a, &b)
        .matching_blocks()
        .iter()
        .map(|block| block.size)
        .sum();
    2.0 * matches as f64 / total as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Block {
    a: usize,
    b: usize,
    size: usize,
}

struct BlockMatcher<'s> {
    a: &'s [char],
    b: &'s [char],
    /// Positions of each character of `b`, popular characters excluded.
    b_index: HashMap<char, Vec<usize>>,
}

impl<'s> BlockMatcher<'s> {
    fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b_index: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b_index.entry(c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            let popular: HashSet<char> = b_index
                .iter()
                .filter(|(_, positions)| positions.len() > limit)
                .map(|(&c, _)| c)
                .collect();
            b_index.retain(|c, _| !popular.contains(c));
        }

        Self { a, b, b_index }
    }

    /// Longest block in `a[alo..ahi]` x `b[blo..bhi]`; ties go to the earliest
    /// start in `a`, then in `b`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let (mut best_a, mut best_b, mut best_size) = (alo, blo, 0);
        let mut run_ending_at: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b_index.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_ending_at.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best_size {
                        best_a = i + 1 - k;
                        best_b = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            run_ending_at = next;
        }

        // popular characters were left out of the index; grow the block over them
        while best_a > alo && best_b > blo && self.a[best_a - 1] == self.b[best_b - 1] {
            best_a -= 1;
            best_b -= 1;
            best_size += 1;
        }
        while best_a + best_size < ahi
            && best_b + best_size < bhi
            && self.a[best_a + best_size] == self.b[best_b + best_size]
        {
            best_size += 1;
        }

        Block {
            a: best_a,
            b: best_b,
            size: best_size,
        }
    }

    fn matching_blocks(&self) -> Vec<Block> {
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let block = self.longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            if alo < block.a && blo < block.b {
                pending.push((alo, block.a, blo, block.b));
            }
            if block.a + block.size < ahi && block.b + block.size < bhi {
                pending.push((block.a + block.size, ahi, block.b + block.size, bhi));
            }
            blocks.push(block);
        }

        blocks.sort();
        blocks
    }
}
