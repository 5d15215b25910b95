//! Cache Key Module
//!
//! Defines the bound on cache keys and the "blank key" convention.

use std::hash::Hash;

// == Cache Key ==
/// Bound for types usable as cache keys.
///
/// A *blank* key is the empty/zero value of its type (`0`, `""`, `false`,
/// `None`). Blank keys can be inserted with `put` and leave the cache through
/// expiry or LRU eviction, but `remove` ignores them.
///
/// Custom key types get the default `is_blank` (never blank):
///
/// ```
/// use evict_cache::CacheKey;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// struct UserId(u64);
///
/// impl CacheKey for UserId {}
///
/// assert!(!UserId(0).is_blank());
/// ```
pub trait CacheKey: Eq + Hash + Clone + Send + Sync + 'static {
    /// Returns true if this key is the blank value of its type.
    fn is_blank(&self) -> bool {
        false
    }
}

macro_rules! impl_cache_key_for_ints {
    ($($t:ty),*) => {
        $(
            impl CacheKey for $t {
                fn is_blank(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

impl_cache_key_for_ints!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl CacheKey for bool {
    fn is_blank(&self) -> bool {
        !*self
    }
}

impl CacheKey for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl CacheKey for &'static str {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl CacheKey for char {}

impl<T: CacheKey> CacheKey for Option<T> {
    fn is_blank(&self) -> bool {
        self.is_none()
    }
}
