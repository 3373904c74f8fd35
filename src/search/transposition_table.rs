//! Fixed-size transposition table keyed by Zobrist hash.
//!
//! Direct indexing with depth-preferred replacement and generation aging to
//! evict stale entries.

use crate::moves::move_descriptions::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub key: u64,
    pub depth: u8,
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

impl TTEntry {
    /// Classify `score` against the window the node was searched with.
    pub fn bound_for(score: i32, alpha_orig: i32, beta: i32) -> Bound {
        if score <= alpha_orig {
            Bound::Upper
        } else if score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        }
    }

    /// Apply this entry to the `(alpha, beta)` window of a node searched to
    /// `depth`.
    ///
    /// Entries shallower than `depth` are ignored. An exact score, or a bound
    /// that closes the window, settles the node.
    pub fn cutoff(&self, depth: u8, alpha: i32, beta: i32) -> Option<TTCutoff> {
        if self.depth < depth {
            return None;
        }

        let (mut alpha, mut beta) = (alpha, beta);
        match self.bound {
            Bound::Exact => return Some(TTCutoff::Score(self.score)),
            Bound::Lower => alpha = alpha.max(self.score),
            Bound::Upper => beta = beta.min(self.score),
        }

        if alpha >= beta {
            Some(TTCutoff::Score(self.score))
        } else {
            Some(TTCutoff::Window { alpha, beta })
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

/// What a probe contributes to an alpha-beta node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TTCutoff {
    /// The stored result settles the node.
    Score(i32),
    /// Narrowed window to search with.
    Window { alpha: i32, beta: i32 },
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    generations: Vec<u8>,
    current_generation: u8,
    stats: TTStats,
}

impl TranspositionTable {
    const AGE_REPLACE_THRESHOLD: u8 = 4;
    const DEPTH_REPLACE_MARGIN: u8 = 2;

    pub fn new_with_mb(size_mb: usize) -> Self {
        let bytes = size_mb.max(1) * 1024 * 1024;
        let entry_size = std::mem::size_of::<Option<TTEntry>>().max(1);
        let count = (bytes / entry_size).max(1);
        Self::with_entries(count)
    }

    pub fn with_entries(count: usize) -> Self {
        let count = count.max(1);
        Self {
            entries: vec![None; count],
            generations: vec![0; count],
            current_generation: 0,
            stats: TTStats::default(),
        }
    }

    /// Advance the generation; called once per iterative-deepening depth.
    #[inline]
    pub fn new_generation(&mut self) {
        self.current_generation = self.current_generation.wrapping_add(1);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.generations.fill(0);
        self.current_generation = 0;
        self.stats = TTStats::default();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    #[inline]
    fn idx(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    pub fn probe(&mut self, key: u64) -> Option<TTEntry> {
        self.stats.probes += 1;
        let idx = self.idx(key);
        let hit = self.entries[idx].filter(|e| e.key == key);
        if hit.is_some() {
            self.stats.hits += 1;
            self.generations[idx] = self.current_generation;
        }
        hit
    }

    /// Best move recorded for `key` at any depth, for move ordering.
    #[inline]
    pub fn best_move_hint(&mut self, key: u64) -> Option<Move> {
        self.probe(key).and_then(|e| e.best_move)
    }

    #[inline]
    pub fn probe_window(&mut self, key: u64, depth: u8, alpha: i32, beta: i32) -> Option<TTCutoff> {
        self.probe(key)?.cutoff(depth, alpha, beta)
    }

    pub fn store(&mut self, entry: TTEntry) {
        self.stats.stores += 1;
        let idx = self.idx(entry.key);
        match self.entries[idx] {
            None => {
                self.entries[idx] = Some(entry);
                self.generations[idx] = self.current_generation;
            }
            Some(existing) => {
                let same_key = existing.key == entry.key;
                let age = self.current_generation.wrapping_sub(self.generations[idx]);
                let stale = age >= Self::AGE_REPLACE_THRESHOLD;

                let replace = if same_key {
                    entry.depth >= existing.depth
                } else {
                    stale
                        || entry.depth.saturating_add(Self::DEPTH_REPLACE_MARGIN) >= existing.depth
                };

                if replace {
                    self.entries[idx] = Some(entry);
                    self.generations[idx] = self.current_generation;
                }
            }
        }
    }
}
