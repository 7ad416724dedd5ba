use chordline_types::{BlockId, ChordBlock};

/// Position tolerance, in beats, used when looking for a block to merge into.
pub const FIND_TOLERANCE: f64 = 0.01;

/// Owns every placed block. Order is insertion order; the last block is the
/// topmost for hit-testing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockStore {
    blocks: Vec<ChordBlock>,
    next_id: u32,
}

impl BlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a block, assigning it a fresh id. Degenerate position or
    /// duration is clamped.
    pub fn add(&mut self, mut block: ChordBlock) -> BlockId {
        let id = BlockId::new(self.next_id);
        self.next_id += 1;
        block.id = id;
        block.sanitize();
        self.blocks.push(block);
        id
    }

    pub fn remove(&mut self, id: BlockId) -> Option<ChordBlock> {
        let idx = self.blocks.iter().position(|b| b.id == id)?;
        Some(self.blocks.remove(idx))
    }

    /// Remove every block whose id is in `ids`. Returns how many were removed.
    pub fn remove_many<'a>(&mut self, ids: impl IntoIterator<Item = &'a BlockId>) -> usize {
        let ids: Vec<BlockId> = ids.into_iter().copied().collect();
        let before = self.blocks.len();
        self.blocks.retain(|b| !ids.contains(&b.id));
        before - self.blocks.len()
    }

    pub fn get(&self, id: BlockId) -> Option<&ChordBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut ChordBlock> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.get(id).is_some()
    }

    /// First block on `track` whose position is within `tolerance` of `position`.
    pub fn find(&self, position: f64, track: u32, tolerance: f64) -> Option<BlockId> {
        self.blocks
            .iter()
            .find(|b| b.track == track && (b.position - position).abs() < tolerance)
            .map(|b| b.id)
    }

    /// Replace the whole store, keeping the ids carried by `blocks`.
    /// Used to restore history snapshots.
    pub fn replace_all(&mut self, blocks: Vec<ChordBlock>) {
        self.blocks = blocks;
        self.recalculate_next_id();
    }

    /// Replace the whole store with blocks from outside (a loaded file),
    /// assigning fresh ids.
    pub fn load_blocks(&mut self, blocks: Vec<ChordBlock>) {
        self.blocks.clear();
        self.next_id = 0;
        for block in blocks {
            self.add(block);
        }
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    pub fn blocks(&self) -> &[ChordBlock] {
        &self.blocks
    }

    /// Deep copy of the current contents, ids included.
    pub fn snapshot(&self) -> Vec<ChordBlock> {
        self.blocks.clone()
    }

    pub fn ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks.iter().map(|b| b.id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Furthest beat covered by any block, 0 when empty.
    pub fn max_end(&self) -> f64 {
        self.blocks.iter().map(|b| b.end()).fold(0.0, f64::max)
    }

    pub fn max_track(&self) -> Option<u32> {
        self.blocks.iter().map(|b| b.track).max()
    }

    fn recalculate_next_id(&mut self) {
        let max = self.blocks.iter().map(|b| b.id.get()).max();
        self.next_id = self.next_id.max(max.map_or(0, |m| m + 1));
    }
}
