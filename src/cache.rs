use std::{collections::VecDeque, sync::Mutex};

use ahash::{HashMap, HashMapExt};

use crate::{partial_solution::UpDownPair, Vertex};

const MAXIMUM_CAPACITY: usize = 8000;

/// Cache of up and down partial solutions keyed by their query endpoint.
///
/// Implementations are safe to share between query threads.
pub trait PartialSolutionCache: Send + Sync {
    fn put(&self, vertex: Vertex, pair: UpDownPair);

    fn get_if_present(&self, vertex: Vertex) -> Option<UpDownPair>;
}

/// Returns the cached pair for `vertex`, or computes, stores and returns it.
pub fn get_or_calculate(
    cache: &dyn PartialSolutionCache,
    vertex: Vertex,
    calculate: impl FnOnce() -> UpDownPair,
) -> UpDownPair {
    if let Some(pair) = cache.get_if_present(vertex) {
        return pair;
    }

    let pair = calculate();
    cache.put(vertex, pair.clone());
    pair
}

/// Map bounded to [`MAXIMUM_CAPACITY`] entries, evicting the eldest entry on
/// overflow.
struct BoundedMap<V> {
    map: HashMap<Vertex, V>,
    insertion_order: VecDeque<Vertex>,
}

impl<V> BoundedMap<V> {
    fn new() -> BoundedMap<V> {
        BoundedMap {
            map: HashMap::new(),
            insertion_order: VecDeque::new(),
        }
    }

    fn put(&mut self, vertex: Vertex, value: V) {
        if self.map.insert(vertex, value).is_none() {
            self.insertion_order.push_back(vertex);

            if self.insertion_order.len() > MAXIMUM_CAPACITY {
                if let Some(eldest) = self.insertion_order.pop_front() {
                    self.map.remove(&eldest);
                }
            }
        }
    }
}

/// In-memory cache holding the pairs directly.
pub struct SimpleCache {
    underlying_cache: Mutex<BoundedMap<UpDownPair>>,
}

impl SimpleCache {
    pub fn new() -> SimpleCache {
        SimpleCache {
            underlying_cache: Mutex::new(BoundedMap::new()),
        }
    }
}

impl Default for SimpleCache {
    fn default() -> Self {
        SimpleCache::new()
    }
}

impl PartialSolutionCache for SimpleCache {
    fn put(&self, vertex: Vertex, pair: UpDownPair) {
        self.underlying_cache.lock().unwrap().put(vertex, pair);
    }

    fn get_if_present(&self, vertex: Vertex) -> Option<UpDownPair> {
        self.underlying_cache.lock().unwrap().map.get(&vertex).cloned()
    }
}

/// Cache holding bincode-encoded pairs, trading lookup time for a smaller
/// resident footprint.
pub struct BinaryCache {
    underlying_cache: Mutex<BoundedMap<Vec<u8>>>,
}

impl BinaryCache {
    pub fn new() -> BinaryCache {
        BinaryCache {
            underlying_cache: Mutex::new(BoundedMap::new()),
        }
    }
}

impl Default for BinaryCache {
    fn default() -> Self {
        BinaryCache::new()
    }
}

impl PartialSolutionCache for BinaryCache {
    fn put(&self, vertex: Vertex, pair: UpDownPair) {
        let bytes = bincode::serialize(&pair).unwrap();
        self.underlying_cache.lock().unwrap().put(vertex, bytes);
    }

    fn get_if_present(&self, vertex: Vertex) -> Option<UpDownPair> {
        let underlying_cache = self.underlying_cache.lock().unwrap();
        let bytes = underlying_cache.map.get(&vertex)?;

        Some(bincode::deserialize(bytes).unwrap())
    }
}
