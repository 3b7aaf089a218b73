use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use log::{debug, trace};

use crate::{AllocError, Chunk};

/// Tuning knobs for a [`ChunkPool`].
///
/// # Example
///
/// ```
/// use cached_deque::{ChunkPool, PoolConfig};
///
/// let pool: ChunkPool<u32> = ChunkPool::with_config(PoolConfig::new().with_max_cached(4));
/// assert_eq!(pool.config().max_cached, Some(4));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct PoolConfig {
    /// How many idle chunks of each capacity the pool keeps for reuse.
    ///
    /// `None`, the default, keeps every released chunk.
    pub max_cached: Option<usize>,
}

impl PoolConfig {
    /// Creates the default configuration, which caches without limit.
    pub const fn new() -> Self {
        PoolConfig { max_cached: None }
    }

    /// Limits the number of idle chunks kept per capacity.
    pub const fn with_max_cached(mut self, max_cached: usize) -> Self {
        self.max_cached = Some(max_cached);
        self
    }
}

/// Counters describing the traffic a [`ChunkPool`] has served.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct PoolStats {
    /// Chunks obtained from the system allocator.
    pub allocated: usize,
    /// Acquisitions served from the cache.
    pub reused: usize,
    /// Chunks handed back to the pool.
    pub released: usize,
    /// Chunks returned to the system allocator, either because the cache was
    /// full on release or because the pool was shrunk.
    pub freed: usize,
}

/// A cache of empty chunks, keyed by capacity.
///
/// Containers draw their storage from a pool and give each chunk back the
/// moment it becomes empty, so a steady push/pop workload stops calling the
/// system allocator once the pool has warmed up.
///
/// # Example
///
/// ```
/// use cached_deque::ChunkPool;
///
/// let mut pool: ChunkPool<u64> = ChunkPool::new();
///
/// let chunk = pool.acquire(16)?;
/// pool.release(chunk);
/// let _chunk = pool.acquire(16)?;
///
/// assert_eq!(pool.stats().allocated, 1);
/// assert_eq!(pool.stats().reused, 1);
/// # Ok::<(), cached_deque::AllocError>(())
/// ```
pub struct ChunkPool<T> {
    free: HashMap<usize, Vec<Chunk<T>>>,
    config: PoolConfig,
    stats: PoolStats,
}

impl<T> ChunkPool<T> {
    /// Creates an empty pool that caches without limit.
    pub fn new() -> Self {
        Self::with_config(PoolConfig::new())
    }

    /// Creates an empty pool with the given configuration.
    pub fn with_config(config: PoolConfig) -> Self {
        ChunkPool {
            free: HashMap::new(),
            config,
            stats: PoolStats::default(),
        }
    }

    /// Hands out an empty chunk of `capacity` slots, reusing a cached one when
    /// available.
    ///
    /// # Errors
    ///
    /// Fails only when new storage is needed and cannot be allocated.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn acquire(&mut self, capacity: usize) -> Result<Chunk<T>, AllocError> {
        assert!(capacity > 0, "chunk capacity must be non-zero");

        if let Some(mut chunk) = self.free.get_mut(&capacity).and_then(Vec::pop) {
            chunk.reset(0);
            self.stats.reused += 1;
            trace!("reusing cached chunk of capacity {capacity}");
            return Ok(chunk);
        }

        let chunk = Chunk::allocate(capacity)?;
        self.stats.allocated += 1;
        trace!("allocated chunk of capacity {capacity}");
        Ok(chunk)
    }

    /// Takes a chunk back.
    ///
    /// Elements still live in the chunk are dropped first. The chunk is cached
    /// unless the configured limit for its capacity is reached, in which case
    /// its storage is freed.
    pub fn release(&mut self, mut chunk: Chunk<T>) {
        chunk.clear();
        self.stats.released += 1;

        let capacity = chunk.capacity();
        match self.config.max_cached {
            Some(max) if self.cached(capacity) >= max => {
                self.stats.freed += 1;
                debug!("cache for capacity {capacity} is full ({max} chunks), freeing chunk");
            }
            _ => self.free.entry(capacity).or_default().push(chunk),
        }
    }

    /// Returns the number of idle chunks of `capacity` slots.
    pub fn cached(&self, capacity: usize) -> usize {
        self.free.get(&capacity).map_or(0, Vec::len)
    }

    /// Returns the number of idle chunks of any capacity.
    pub fn cached_total(&self) -> usize {
        self.free.values().map(Vec::len).sum()
    }

    /// Frees every idle chunk.
    pub fn shrink(&mut self) {
        let count = self.cached_total();
        if count > 0 {
            debug!("shrinking pool, freeing {count} chunks");
        }
        self.stats.freed += count;
        self.free.clear();
    }

    /// Returns the pool's configuration.
    pub fn config(&self) -> PoolConfig {
        self.config
    }

    /// Returns the pool's traffic counters.
    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}

impl<T> Default for ChunkPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ChunkPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkPool")
            .field("config", &self.config)
            .field("stats", &self.stats)
            .field("cached", &self.cached_total())
            .finish()
    }
}

/// A handle through which a container reaches its chunk pool.
///
/// A [`ChunkPool`] itself is a handle to a private pool. A
/// `&RefCell<ChunkPool<T>>` is a handle to a pool shared by every container
/// borrowing it; the borrow checker keeps such a pool alive for as long as any
/// of them.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
///
/// use cached_deque::{ChunkPool, Deque};
///
/// let pool = RefCell::new(ChunkPool::new());
///
/// let mut a = Deque::with_pool(&pool);
/// a.push_back(1);
/// a.clear();
///
/// let mut b = Deque::with_pool(&pool);
/// b.push_back(2);
///
/// assert_eq!(pool.borrow().stats().allocated, 1);
/// ```
pub trait PoolRef<T> {
    /// See [`ChunkPool::acquire`].
    ///
    /// The chunk must have exactly `capacity` slots. [`Deque`] panics on any
    /// other size.
    ///
    /// [`Deque`]: crate::Deque
    fn acquire(&mut self, capacity: usize) -> Result<Chunk<T>, AllocError>;

    /// See [`ChunkPool::release`].
    fn release(&mut self, chunk: Chunk<T>);

    /// Returns a handle for a new container created next to the one holding
    /// `self`: a fresh private pool with the same configuration, or the same
    /// shared pool.
    fn sibling(&self) -> Self
    where
        Self: Sized;
}

impl<T> PoolRef<T> for ChunkPool<T> {
    fn acquire(&mut self, capacity: usize) -> Result<Chunk<T>, AllocError> {
        ChunkPool::acquire(self, capacity)
    }

    fn release(&mut self, chunk: Chunk<T>) {
        ChunkPool::release(self, chunk);
    }

    fn sibling(&self) -> Self {
        ChunkPool::with_config(self.config)
    }
}

impl<'p, T> PoolRef<T> for &'p RefCell<ChunkPool<T>> {
    fn acquire(&mut self, capacity: usize) -> Result<Chunk<T>, AllocError> {
        self.borrow_mut().acquire(capacity)
    }

    fn release(&mut self, mut chunk: Chunk<T>) {
        // Destructors may touch the pool themselves, so run them unborrowed.
        chunk.clear();
        self.borrow_mut().release(chunk);
    }

    fn sibling(&self) -> Self {
        *self
    }
}
