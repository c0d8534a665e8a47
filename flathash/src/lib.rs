/*
 * Created on Tue Mar 12 2024
 *
 * This file is a part of FlatHash
 * FlatHash is a free and open-source in-memory index library written by
 * Sayan Nandan ("the Author") with the vision to provide predictable,
 * cache-friendly point lookups without compromising on safety or
 * portability.
 *
 * Copyright (c) 2024, Sayan Nandan <ohsayan@outlook.com>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! # FlatHash
//!
//! An open-addressed, group-probed in-memory index (a "flat" hash table) tuned for hot
//! point-lookup paths: the per-slot control byte carries a 7-bit hash fragment, and a
//! SIMD backend answers "which lanes could hold my key" for a whole group of slots per
//! load. A set and a map facade share the single table core.
//!
//! Everything that shapes a table — hasher, group backend, collision policy, hash
//! mixing, per-slot hash caching, load factor — is a compile-time [`Config`] so that the
//! probe path monomorphizes with zero indirect calls. The container is single-threaded
//! by design: no locks, no atomics; wrap it yourself if you must share it.
//!
//! Iterators borrow the table and are therefore statically immune to invalidation: any
//! operation that could rehash takes `&mut self` and won't coexist with a live iterator.

#![deny(unreachable_patterns)]

pub mod flat;
mod mem;
pub mod meta;
pub mod simd;
#[cfg(test)]
pub(crate) mod test_utils;

use core::borrow::Borrow;

// re-exports
pub use flat::{
    config::{
        CacheHash, CachePolicy, CachedConfig, CollisionPolicy, Config, DefConfig, Element,
        FxConfig, Identity, Linear, LinearConfig, Mix, MixPolicy, Pair, Quadratic, RecomputeHash,
        SetKey,
    },
    imp::{FlatMap, FlatSet},
};

pub type IndexSTFlatSet<K> = FlatSet<K, DefConfig>;
pub type IndexSTFlatMap<K, V> = FlatMap<K, V, DefConfig>;
pub type IndexSTFlatSetFx<K> = FlatSet<K, FxConfig>;
pub type IndexSTFlatMapFx<K, V> = FlatMap<K, V, FxConfig>;

/// Any type implementing this trait can be used as a key inside the index structures
pub trait AsKey: core::hash::Hash + Eq {
    /// Read the key
    fn read_key(&self) -> &Self;
}

impl<T: core::hash::Hash + Eq + ?Sized> AsKey for T {
    fn read_key(&self) -> &Self {
        self
    }
}

/// If your T can be cloned/copied and implements [`AsKey`], then this trait will automatically be implemented
pub trait AsKeyClone: AsKey + Clone {
    /// Read the key and return a clone
    fn read_key_clone(&self) -> Self;
}

impl<T: AsKey + Clone + ?Sized> AsKeyClone for T {
    #[inline(always)]
    fn read_key_clone(&self) -> Self {
        Clone::clone(self)
    }
}

pub trait AsValue {
    fn read_value(&self) -> &Self;
}
impl<T: ?Sized> AsValue for T {
    fn read_value(&self) -> &Self {
        self
    }
}

/// Any type implementing this trait can be used as a value inside the index structures
pub trait AsValueClone: AsValue + Clone {
    /// Read the value and return a clone
    fn read_value_clone(&self) -> Self;
}

impl<T: AsValue + Clone + ?Sized> AsValueClone for T {
    #[inline(always)]
    fn read_value_clone(&self) -> Self {
        Clone::clone(self)
    }
}

/// The lookup miss for the result-valued operations (`get`, `try_erase`). Misses are
/// ordinary control flow, not failures; this is the whole error surface of the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotFound;

impl core::fmt::Display for NotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("key not found")
    }
}

impl std::error::Error for NotFound {}

/// The base spec for any index. Iterators have meaningless order, and that is intentional and oftentimes
/// consequential. For more specialized impls, use the [`STIndex`] or [`STIndexSet`] traits
pub trait IndexBaseSpec: Sized {
    /// Index supports prealloc?
    const PREALLOC: bool;
    #[cfg(debug_assertions)]
    /// A type representing debug metrics
    type Metrics;
    /// Initialize an empty instance of the index
    fn idx_init() -> Self;
    /// Initialize a pre-loaded instance of the index
    fn idx_init_with(s: Self) -> Self;
    /// Init the idx with the given cap
    ///
    /// By default doesn't attempt to allocate
    fn idx_init_cap(_: usize) -> Self {
        if Self::PREALLOC {
            panic!("expected prealloc");
        }
        Self::idx_init()
    }
    #[cfg(debug_assertions)]
    /// Returns a reference to the index metrics
    fn idx_metrics(&self) -> &Self::Metrics;
}

/// An unordered single-threaded map-shaped index
pub trait STIndex<K, V>: IndexBaseSpec {
    /// An iterator over the keys and values
    type IterKV<'a>: Iterator<Item = (&'a K, &'a V)>
    where
        Self: 'a,
        K: 'a,
        V: 'a;
    /// An iterator over the keys
    type IterKey<'a>: Iterator<Item = &'a K>
    where
        Self: 'a,
        K: 'a;
    /// An iterator over the values
    type IterValue<'a>: Iterator<Item = &'a V>
    where
        Self: 'a,
        V: 'a;
    fn st_len(&self) -> usize;
    fn st_is_empty(&self) -> bool {
        self.st_len() == 0
    }
    /// Clears all the entries in the index and releases the backing storage
    fn st_clear(&mut self);
    /// Ensure capacity for at least `cap` elements without further growth
    fn st_reserve(&mut self, cap: usize);
    /// Returns true if the entry was inserted successfully; returns false if the uniqueness constraint is
    /// violated
    fn st_insert(&mut self, key: K, val: V) -> bool;
    /// Updates or inserts the given value, returning the older value if one existed
    fn st_upsert(&mut self, key: K, val: V) -> Option<V>;
    fn st_contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey;
    /// Returns a reference to the value corresponding to the key, if it exists
    fn st_get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey;
    /// Returns a clone of the value corresponding to the key, if it exists
    fn st_get_cloned<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
        V: AsValueClone;
    /// Returns a mutable reference to the value corresponding to the key, if it exists
    fn st_get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey;
    /// Returns true if the entry is updated
    fn st_update<Q>(&mut self, key: &Q, val: V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey;
    /// Updates the entry and returns the old value, if it exists
    fn st_update_return<Q>(&mut self, key: &Q, val: V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey;
    /// Returns true if the entry was deleted
    fn st_delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey;
    /// Removes the entry and returns it, if it exists
    fn st_delete_return<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey;
    /// Returns an iterator over a tuple of keys and values
    fn st_iter_kv<'a>(&'a self) -> Self::IterKV<'a>;
    /// Returns an iterator over the keys
    fn st_iter_key<'a>(&'a self) -> Self::IterKey<'a>;
    /// Returns an iterator over the values
    fn st_iter_value<'a>(&'a self) -> Self::IterValue<'a>;
}

/// An unordered single-threaded set-shaped index (the key is the whole element)
pub trait STIndexSet<K>: IndexBaseSpec {
    /// An iterator over the keys
    type IterKey<'a>: Iterator<Item = &'a K>
    where
        Self: 'a,
        K: 'a;
    fn st_len(&self) -> usize;
    fn st_is_empty(&self) -> bool {
        self.st_len() == 0
    }
    /// Clears all the entries in the index and releases the backing storage
    fn st_clear(&mut self);
    /// Ensure capacity for at least `cap` elements without further growth
    fn st_reserve(&mut self, cap: usize);
    /// Returns true if the key was inserted; false if it was already present
    fn st_insert(&mut self, key: K) -> bool;
    fn st_contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey;
    /// Returns a reference to the stored key equal to `key`, if any
    fn st_get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey;
    /// Returns a clone of the stored key equal to `key`, if any
    fn st_get_cloned<Q>(&self, key: &Q) -> Option<K>
    where
        K: AsKeyClone + Borrow<Q>,
        Q: ?Sized + AsKey;
    /// Returns true if the key was deleted
    fn st_delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey;
    /// Removes the key and returns it, if it exists
    fn st_delete_return<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey;
    /// Returns an iterator over the keys
    fn st_iter_key<'a>(&'a self) -> Self::IterKey<'a>;
}
