// World constants
pub const CHUNK_WIDTH: i32 = 16;
pub const CHUNK_HEIGHT: i32 = 128;
pub const WORLD_SIZE_IN_CHUNKS: i32 = 100;
pub const VIEW_DISTANCE_IN_CHUNKS: i32 = 5;
pub const DEFAULT_SEED: u32 = 2137;

// Spawn sits this many voxels above the top of the world
pub const SPAWN_HEIGHT_OFFSET: f32 = 2.0;

// Offset applied before noise scaling, keeps samples off the integer lattice
pub const NOISE_SAMPLE_OFFSET: f32 = 0.1;

// Grass -> dirt band depth below the surface
pub const DIRT_DEPTH: i32 = 4;

// Optimization constants
pub const MAX_CHUNKS_PER_TICK: usize = 4;
pub const PREFETCH_QUEUE_CAPACITY: usize = 256;
pub const PREFETCH_RESULT_CAPACITY: usize = 64;

// Longest a recompute blocks on a chunk already queued for a worker
pub const PREFETCH_WAIT_TIMEOUT_SECS: u64 = 5;
