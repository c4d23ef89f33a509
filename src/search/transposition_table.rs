//! Fixed-size forgetful transposition table keyed by Zobrist hash.
//!
//! One entry per slot, indexed by `hash % capacity`. Every store overwrites
//! its slot unconditionally; a probe only hits when the stored hash matches
//! and the stored depth covers the requested depth.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub key: u64,
    pub depth: u8,
    pub score: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
    pub overwrites: u64,
}

/// Number of slots that fit in `size_mb` MiB.
pub fn entries_for_mb(size_mb: usize) -> usize {
    let bytes = size_mb.max(1) * 1024 * 1024;
    let entry_size = std::mem::size_of::<Option<TTEntry>>().max(1);
    (bytes / entry_size).max(1)
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    stats: TTStats,
}

impl TranspositionTable {
    pub fn new(entry_count: usize) -> Self {
        Self {
            entries: vec![None; entry_count.max(1)],
            stats: TTStats::default(),
        }
    }

    pub fn new_with_mb(size_mb: usize) -> Self {
        Self::new(entries_for_mb(size_mb))
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.fill(None);
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

    /// Cached score for `key` searched at least `depth` plies deep.
    pub fn probe(&mut self, key: u64, depth: u8) -> Option<i32> {
        self.stats.probes += 1;
        let idx = self.idx(key);
        let hit = self.entries[idx]
            .filter(|entry| entry.key == key && entry.depth >= depth)
            .map(|entry| entry.score);
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    pub fn store(&mut self, key: u64, depth: u8, score: i32) {
        self.stats.stores += 1;
        let idx = self.idx(key);
        if self.entries[idx].is_some() {
            self.stats.overwrites += 1;
        }
        self.entries[idx] = Some(TTEntry { key, depth, score });
    }
}
