//! Fixed-size 2D grid of chunk slots
//!
//! Every access goes through bounds-checked accessors. The index also owns
//! each chunk's visibility state and the set of active coordinates, so the
//! two can never drift apart.

use rustc_hash::FxHashSet;

use crate::core::chunk::Chunk;
use crate::core::coord::ChunkCoord;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ChunkState {
    Nonexistent,
    Inactive,
    Active,
}

struct ChunkSlot {
    chunk: Chunk,
    active: bool,
}

pub struct ChunkIndex {
    size: i32,
    slots: Vec<Option<ChunkSlot>>,
    active: FxHashSet<ChunkCoord>,
    chunk_count: usize,
}

impl ChunkIndex {
    pub fn new(world_size_in_chunks: i32) -> Self {
        let size = world_size_in_chunks.max(0);
        let mut slots = Vec::with_capacity((size * size) as usize);
        slots.resize_with((size * size) as usize, || None);

        ChunkIndex {
            size,
            slots,
            active: FxHashSet::default(),
            chunk_count: 0,
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Raw grid bounds, including the outer ring.
    pub fn in_grid(&self, coord: ChunkCoord) -> bool {
        coord.x >= 0 && coord.x < self.size && coord.z >= 0 && coord.z < self.size
    }

    /// Coordinates a chunk may be created at. The outermost ring is excluded.
    pub fn is_in_world(&self, coord: ChunkCoord) -> bool {
        coord.x > 0 && coord.x < self.size - 1 && coord.z > 0 && coord.z < self.size - 1
    }

    fn slot_index(&self, coord: ChunkCoord) -> Option<usize> {
        if self.in_grid(coord) {
            Some((coord.x * self.size + coord.z) as usize)
        } else {
            None
        }
    }

    fn slot(&self, coord: ChunkCoord) -> Option<&ChunkSlot> {
        self.slot_index(coord).and_then(|i| self.slots[i].as_ref())
    }

    fn slot_mut(&mut self, coord: ChunkCoord) -> Option<&mut ChunkSlot> {
        match self.slot_index(coord) {
            Some(i) => self.slots[i].as_mut(),
            None => None,
        }
    }

    pub fn exists(&self, coord: ChunkCoord) -> bool {
        self.slot(coord).is_some()
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.slot(coord).map(|slot| &slot.chunk)
    }

    pub fn state(&self, coord: ChunkCoord) -> ChunkState {
        match self.slot(coord) {
            None => ChunkState::Nonexistent,
            Some(slot) if slot.active => ChunkState::Active,
            Some(_) => ChunkState::Inactive,
        }
    }

    pub fn is_active(&self, coord: ChunkCoord) -> bool {
        self.state(coord) == ChunkState::Active
    }

    /// Store a freshly built chunk.
    ///
    /// # Panics
    /// If `coord` is outside the grid, the slot is occupied, the chunk was
    /// built for another coordinate, or `state` is `Nonexistent`.
    pub fn insert(&mut self, coord: ChunkCoord, chunk: Chunk, state: ChunkState) {
        assert_eq!(chunk.coord(), coord, "chunk built for {:?}", chunk.coord());
        let active = match state {
            ChunkState::Active => true,
            ChunkState::Inactive => false,
            ChunkState::Nonexistent => panic!("cannot insert {:?} as nonexistent", coord),
        };
        let Some(index) = self.slot_index(coord) else {
            panic!("chunk {:?} is outside the {}x{} grid", coord, self.size, self.size);
        };
        assert!(self.slots[index].is_none(), "chunk {:?} already exists", coord);

        self.slots[index] = Some(ChunkSlot { chunk, active });
        self.chunk_count += 1;
        if active {
            self.active.insert(coord);
        }
    }

    /// Inactive -> Active. Returns false if it was already active.
    ///
    /// # Panics
    /// If no chunk exists at `coord`.
    pub fn activate(&mut self, coord: ChunkCoord) -> bool {
        let Some(slot) = self.slot_mut(coord) else {
            panic!("cannot activate missing chunk {:?}", coord);
        };
        if slot.active {
            return false;
        }
        slot.active = true;
        self.active.insert(coord);
        true
    }

    /// Active -> Inactive. Returns false if it was already inactive.
    ///
    /// # Panics
    /// If no chunk exists at `coord`.
    pub fn deactivate(&mut self, coord: ChunkCoord) -> bool {
        let Some(slot) = self.slot_mut(coord) else {
            panic!("cannot deactivate missing chunk {:?}", coord);
        };
        if !slot.active {
            return false;
        }
        slot.active = false;
        self.active.remove(&coord);
        true
    }

    pub fn active_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.active.iter().copied()
    }

    /// Active coordinates in a stable order.
    pub fn sorted_active_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.active_coords().collect();
        coords.sort();
        coords
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }
}
