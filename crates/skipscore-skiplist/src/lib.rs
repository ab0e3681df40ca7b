//! Probabilistic score-ordered map (skip list) for skipscore.
//!
//! Values are kept in ascending order of an `f64` score. Insert, exact
//! lookup, and delete run in expected `O(log n)` time; nodes get a random
//! height instead of the structure being rebalanced.
//!
//! ```text
//! Level 2:  HEAD ─────────────────────► 5.0 ──────────► NIL
//! Level 1:  HEAD ────────► 3.0 ───────► 5.0 ──────────► NIL
//! Level 0:  HEAD ──► 1.0 ─► 3.0 ─► 4.0 ─► 5.0 ─► 9.0 ─► NIL
//! ```
//!
//! # Example
//!
//! ```rust
//! use skipscore_skiplist::SkipList;
//!
//! let mut list = SkipList::seeded(7);
//! list.insert(5.0, "e");
//! list.insert(1.0, "a");
//! list.insert(3.0, "c");
//!
//! assert_eq!(list.size(), 3);
//! assert_eq!(list.get(3.0), Some(&"c"));
//!
//! let scores: Vec<f64> = list.iter().map(|(score, _)| score).collect();
//! assert_eq!(scores, [1.0, 3.0, 5.0]);
//!
//! let removed = list.delete(1.0).unwrap();
//! assert_eq!(removed.value, "a");
//! assert!(list.delete(99.0).is_none());
//! ```
//!
//! Scores compare with plain `<` and `==`, so lookups need the exact score
//! that was inserted. NaN scores leave the order unspecified.

mod level;
mod node;

use anyhow::ensure;
use rand::Rng;
use skipscore_config::SkipListConfig;
use skipscore_logging::{LogEntry, LogLevel, Logger, LoggingConfig};
use std::fmt;

pub use level::{GeometricLevelGenerator, LevelGenerator};
pub use node::{Entry, Iter, Node, NodeId};
pub use skipscore_config::{DEFAULT_MAX_LEVEL, DEFAULT_PROBABILITY};

use node::{Arena, Link, NodeData};

/// Component name attached to diagnostic entries.
pub const LOG_COMPONENT: &str = "skiplist";

/// Position during a descent: a node index, or `None` for the head sentinel.
type Position = Option<usize>;

/// Score-ordered map with randomized levels.
///
/// The list is single-threaded; mutation takes `&mut self`.
pub struct SkipList<V, G = GeometricLevelGenerator> {
    /// Forward links of the sentinel, one per possible level.
    head: Vec<Link>,
    arena: Arena<V>,
    /// Highest populated level + 1. Never shrinks.
    level: usize,
    size: usize,
    levels: G,
    logger: Option<Logger>,
}

impl<V> SkipList<V> {
    /// Empty list with default parameters and an OS-seeded generator.
    pub fn new() -> Self {
        Self::with_generator(GeometricLevelGenerator::default())
    }

    /// Empty list whose level draws are reproducible.
    pub fn seeded(seed: u64) -> Self {
        Self::with_generator(GeometricLevelGenerator::seeded(seed))
    }

    /// Empty list built from validated configuration.
    pub fn with_config(config: &SkipListConfig) -> anyhow::Result<Self> {
        let mut list = Self::with_generator(GeometricLevelGenerator::from_config(config)?);
        if let Some(logging) = &config.logging {
            list = list.with_logging(logging.clone());
            list.log_with(LogLevel::Info, || {
                format!(
                    "created with max_level={} probability={} seed={:?}",
                    config.max_level, config.probability, config.seed
                )
            });
        }
        Ok(list)
    }
}

impl<V, R: Rng> SkipList<V, GeometricLevelGenerator<R>> {
    /// Empty list with default parameters drawing from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self::with_generator(GeometricLevelGenerator::with_rng(rng))
    }
}

impl<V> Default for SkipList<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, G: LevelGenerator> SkipList<V, G> {
    /// Empty list using a custom height source.
    pub fn with_generator(levels: G) -> Self {
        let max_level = levels.max_level().max(1);
        Self {
            head: vec![None; max_level],
            arena: Arena::new(),
            level: 1,
            size: 0,
            levels,
            logger: None,
        }
    }

    /// Record structural events into an in-memory log.
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logger = Some(Logger::new(config, LOG_COMPONENT));
        self
    }

    /// Entries recorded so far; empty when logging is disabled.
    pub fn log_entries(&self) -> &[LogEntry] {
        match &self.logger {
            Some(logger) => logger.entries(),
            None => &[],
        }
    }

    /// Remove and return the recorded entries.
    pub fn take_log(&mut self) -> Vec<LogEntry> {
        self.logger.as_mut().map(Logger::drain).unwrap_or_default()
    }

    fn log_with(&mut self, level: LogLevel, message: impl FnOnce() -> String) {
        if let Some(logger) = self.logger.as_mut()
            && logger.enabled(level)
        {
            logger.log(level, message());
        }
    }

    /// Number of entries.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of levels currently in use.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn max_level(&self) -> usize {
        self.head.len()
    }

    fn next_at(&self, at: Position, level: usize) -> Link {
        match at {
            None => self.head[level],
            Some(index) => self.arena.get(index).forward[level],
        }
    }

    fn set_next(&mut self, at: Position, level: usize, to: Link) {
        match at {
            None => self.head[level] = to,
            Some(index) => self.arena.get_mut(index).forward[level] = to,
        }
    }

    /// Descend from the top level, reporting the last node before `score` on
    /// each level. Returns the level-0 predecessor.
    fn descend(&self, score: f64, mut record: impl FnMut(usize, Position)) -> Position {
        let mut at: Position = None;
        for i in (0..self.level).rev() {
            while let Some(next) = self.next_at(at, i) {
                if self.arena.get(next).score < score {
                    at = Some(next);
                } else {
                    break;
                }
            }
            record(i, at);
        }
        at
    }

    /// Index of the successor of `at` if it carries exactly `score`.
    fn matching_successor(&self, at: Position, score: f64) -> Option<usize> {
        self.next_at(at, 0)
            .filter(|&index| self.arena.get(index).score == score)
    }

    fn find(&self, score: f64) -> Option<usize> {
        let predecessor = self.descend(score, |_, _| {});
        self.matching_successor(predecessor, score)
    }

    /// The node holding exactly `score`.
    pub fn search(&self, score: f64) -> Option<Node<'_, V>> {
        self.find(score).map(|index| Node::new(&self.arena, index))
    }

    pub fn contains(&self, score: f64) -> bool {
        self.find(score).is_some()
    }

    pub fn get(&self, score: f64) -> Option<&V> {
        self.find(score).map(|index| &self.arena.get(index).value)
    }

    pub fn get_mut(&mut self, score: f64) -> Option<&mut V> {
        let index = self.find(score)?;
        Some(&mut self.arena.get_mut(index).value)
    }

    /// The lowest-scored node.
    pub fn front(&self) -> Option<Node<'_, V>> {
        self.head[0].map(|index| Node::new(&self.arena, index))
    }

    /// Look up a node by handle; `None` once it has been deleted.
    pub fn node(&self, id: NodeId) -> Option<Node<'_, V>> {
        self.arena
            .resolve(id)
            .map(|index| Node::new(&self.arena, index))
    }

    /// Mutable access to a node's value by handle.
    pub fn value_mut(&mut self, id: NodeId) -> Option<&mut V> {
        let index = self.arena.resolve(id)?;
        Some(&mut self.arena.get_mut(index).value)
    }

    /// Insert `value` under `score`, or replace the value already stored
    /// there. Returns the node's handle; a replacement keeps the original
    /// handle.
    pub fn insert(&mut self, score: f64, value: V) -> NodeId {
        let mut update: Vec<Position> = vec![None; self.max_level()];
        let predecessor = self.descend(score, |i, at| update[i] = at);

        if let Some(index) = self.matching_successor(predecessor, score) {
            self.arena.get_mut(index).value = value;
            self.log_with(LogLevel::Trace, || format!("replaced value at score {score}"));
            return self.arena.id(index);
        }

        let mut height = self.levels.random_level().clamp(1, self.max_level());
        if height > self.level {
            // Grow by one level at most, whatever was drawn.
            height = self.level + 1;
            update[self.level] = None;
            let previous = self.level;
            self.level = height;
            self.log_with(LogLevel::Debug, || {
                format!("level raised from {previous} to {height} at score {score}")
            });
        }

        let forward: Vec<Link> = (0..height).map(|i| self.next_at(update[i], i)).collect();
        let index = self.arena.allocate(NodeData {
            score,
            value,
            forward,
        });
        for (i, &at) in update.iter().enumerate().take(height) {
            self.set_next(at, i, Some(index));
        }

        self.size += 1;
        self.arena.id(index)
    }

    /// Remove the entry with exactly `score`, returning it.
    ///
    /// The list's level is left as is even if the top levels empty out.
    pub fn delete(&mut self, score: f64) -> Option<Entry<V>> {
        let mut update: Vec<Position> = vec![None; self.max_level()];
        let predecessor = self.descend(score, |i, at| update[i] = at);

        let Some(target) = self.matching_successor(predecessor, score) else {
            self.log_with(LogLevel::Trace, || format!("delete miss at score {score}"));
            return None;
        };

        let mut unlinked = 0;
        for (i, &at) in update.iter().enumerate().take(self.level) {
            if self.next_at(at, i) != Some(target) {
                break;
            }
            let next = self.arena.get(target).forward[i];
            self.set_next(at, i, next);
            unlinked += 1;
        }
        debug_assert_eq!(
            unlinked,
            self.arena.get(target).forward.len(),
            "node at score {score} was not linked on every level below its height"
        );

        let node = self.arena.release(target);
        self.size -= 1;
        Some(Entry {
            score: node.score,
            value: node.value,
        })
    }

    /// Remove every entry. Outstanding handles become stale.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head.fill(None);
        self.level = 1;
        self.size = 0;
    }

    /// Ascending `(score, &value)` pairs.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.arena, self.head[0], self.size)
    }

    /// Walk every level and check ordering, level nesting, and the size.
    pub fn verify(&self) -> anyhow::Result<()> {
        ensure!(
            (1..=self.max_level()).contains(&self.level),
            "level {} outside 1..={}",
            self.level,
            self.max_level()
        );

        let heights: Vec<usize> = {
            let mut heights = Vec::with_capacity(self.size);
            let mut cursor = self.head[0];
            while let Some(index) = cursor {
                ensure!(heights.len() < self.size, "level 0 holds more than {} nodes", self.size);
                let node = self.arena.get(index);
                heights.push(node.forward.len());
                cursor = node.forward[0];
            }
            heights
        };
        ensure!(
            heights.len() == self.size,
            "level 0 holds {} nodes but size is {}",
            heights.len(),
            self.size
        );

        for i in 0..self.max_level() {
            if i >= self.level {
                ensure!(self.head[i].is_none(), "head links level {i} above level {}", self.level);
                continue;
            }
            let expected = heights.iter().filter(|&&h| h > i).count();
            let mut seen = 0;
            let mut previous: Option<f64> = None;
            let mut cursor = self.head[i];
            while let Some(index) = cursor {
                ensure!(seen < expected, "level {i} holds more nodes than expected ({expected})");
                let node = self.arena.get(index);
                ensure!(
                    node.forward.len() > i,
                    "node at score {} with height {} is linked on level {i}",
                    node.score,
                    node.forward.len()
                );
                if let Some(previous) = previous {
                    ensure!(
                        previous < node.score,
                        "level {i} out of order: {previous} before {}",
                        node.score
                    );
                }
                previous = Some(node.score);
                seen += 1;
                cursor = node.forward[i];
            }
            ensure!(
                seen == expected,
                "level {i} links {seen} nodes but {expected} reach that height"
            );
        }
        Ok(())
    }
}

impl<'a, V, G: LevelGenerator> IntoIterator for &'a SkipList<V, G> {
    type Item = (f64, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V, G: LevelGenerator> Extend<(f64, V)> for SkipList<V, G> {
    fn extend<I: IntoIterator<Item = (f64, V)>>(&mut self, iter: I) {
        for (score, value) in iter {
            self.insert(score, value);
        }
    }
}

impl<V> FromIterator<(f64, V)> for SkipList<V> {
    fn from_iter<I: IntoIterator<Item = (f64, V)>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<V: fmt::Debug, G: LevelGenerator> fmt::Debug for SkipList<V, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
