/*
 * Created on Wed May 8 2024
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

use {
    crate::{
        meta::{hash, AsHasher},
        simd::Lane,
        AsKey,
    },
    core::fmt,
};

/// Anything stored in a flat table: the set facade stores bare keys, the map facade
/// stores key/value pairs. Hashing and comparison always go through `key()`
pub trait Element: Sized {
    type Key: AsKey;
    type Value;
    fn key(&self) -> &Self::Key;
    fn val(&self) -> &Self::Value;
    fn into_val(self) -> Self::Value;
}

/// The map element. The key field is private and no `&mut` to it is ever handed out, so
/// the key portion is immutable for as long as the pair lives in a table
pub struct Pair<K, V> {
    k: K,
    v: V,
}

impl<K, V> Pair<K, V> {
    #[inline(always)]
    pub const fn new(k: K, v: V) -> Self {
        Self { k, v }
    }
    #[inline(always)]
    pub fn into_kv(self) -> (K, V) {
        (self.k, self.v)
    }
    #[inline(always)]
    pub(crate) fn val_mut(&mut self) -> &mut V {
        &mut self.v
    }
}

impl<K: AsKey, V> Element for Pair<K, V> {
    type Key = K;
    type Value = V;
    #[inline(always)]
    fn key(&self) -> &K {
        &self.k
    }
    #[inline(always)]
    fn val(&self) -> &V {
        &self.v
    }
    #[inline(always)]
    fn into_val(self) -> V {
        self.v
    }
}

impl<K: Clone, V: Clone> Clone for Pair<K, V> {
    fn clone(&self) -> Self {
        Self {
            k: self.k.clone(),
            v: self.v.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Pair<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pair").field(&self.k).field(&self.v).finish()
    }
}

/// The set element: a bare key that doubles as its own value
#[repr(transparent)]
#[derive(Clone, Debug)]
pub struct SetKey<K>(K);

impl<K> SetKey<K> {
    #[inline(always)]
    pub const fn new(k: K) -> Self {
        Self(k)
    }
    #[inline(always)]
    pub fn into_inner(self) -> K {
        self.0
    }
}

impl<K: AsKey> Element for SetKey<K> {
    type Key = K;
    type Value = K;
    #[inline(always)]
    fn key(&self) -> &K {
        &self.0
    }
    #[inline(always)]
    fn val(&self) -> &K {
        &self.0
    }
    #[inline(always)]
    fn into_val(self) -> K {
        self.0
    }
}

/*
    collision policy
    ---
    The policy owns the probe cursor. Both variants are closed over a power-of-two group
    count: linear trivially, quadratic via the triangular-number stride which is a
    permutation of Z/2^k, so a probe that never sees an empty lane still visits every
    group exactly once before wrapping.
*/

pub trait CollisionPolicy: Sized + 'static {
    /// Open a probe sequence at the caller's start group
    fn begin(g0: usize) -> Self;
    /// The group the cursor currently points at
    fn group(&self) -> usize;
    /// Step the cursor. `mask` is `groups - 1`
    fn advance(&mut self, mask: usize);
}

pub struct Linear {
    g: usize,
}

impl CollisionPolicy for Linear {
    #[inline(always)]
    fn begin(g0: usize) -> Self {
        Self { g: g0 }
    }
    #[inline(always)]
    fn group(&self) -> usize {
        self.g
    }
    #[inline(always)]
    fn advance(&mut self, mask: usize) {
        self.g = (self.g + 1) & mask;
    }
}

pub struct Quadratic {
    g: usize,
    stride: usize,
}

impl CollisionPolicy for Quadratic {
    #[inline(always)]
    fn begin(g0: usize) -> Self {
        Self { g: g0, stride: 0 }
    }
    #[inline(always)]
    fn group(&self) -> usize {
        self.g
    }
    #[inline(always)]
    fn advance(&mut self, mask: usize) {
        self.stride += 1;
        self.g = (self.g + self.stride) & mask;
    }
}

/*
    hash mixing policy
*/

pub trait MixPolicy: 'static {
    /// Finalize the hasher output before the h1/h2 split
    fn fin(h: u64) -> u64;
}

/// Run the MurmurHash3 64-bit finalizer over the hash. For hashers with weak upper-bit
/// entropy (fx and friends)
pub struct Mix;

impl MixPolicy for Mix {
    #[inline(always)]
    fn fin(h: u64) -> u64 {
        hash::mix64(h)
    }
}

/// Use the hasher output as-is. Only for hashers that already avalanche (the bundled
/// default does)
pub struct Identity;

impl MixPolicy for Identity {
    #[inline(always)]
    fn fin(h: u64) -> u64 {
        h
    }
}

/*
    hash caching policy
    ---
    Decides what a slot physically holds. `CacheHash` spends a word per slot to make
    rehash and erase-then-reinsert workloads independent of hasher cost (long string
    keys); `RecomputeHash` keeps slots lean and rehashes by hashing again.
*/

pub trait CachePolicy<T>: 'static {
    type Slot;
    const CACHED: bool;
    fn form(h: u64, e: T) -> Self::Slot;
    fn elem(s: &Self::Slot) -> &T;
    fn elem_mut(s: &mut Self::Slot) -> &mut T;
    fn dissolve(s: Self::Slot) -> T;
    /// The hash stashed at `form` time. Contract: only called when `CACHED`
    fn stored(s: &Self::Slot) -> u64;
}

pub struct RecomputeHash;

impl<T> CachePolicy<T> for RecomputeHash {
    type Slot = T;
    const CACHED: bool = false;
    #[inline(always)]
    fn form(_: u64, e: T) -> T {
        e
    }
    #[inline(always)]
    fn elem(s: &T) -> &T {
        s
    }
    #[inline(always)]
    fn elem_mut(s: &mut T) -> &mut T {
        s
    }
    #[inline(always)]
    fn dissolve(s: T) -> T {
        s
    }
    fn stored(_: &T) -> u64 {
        panic!("hash not cached under this policy")
    }
}

pub struct CachedSlot<T> {
    h: u64,
    e: T,
}

pub struct CacheHash;

impl<T> CachePolicy<T> for CacheHash {
    type Slot = CachedSlot<T>;
    const CACHED: bool = true;
    #[inline(always)]
    fn form(h: u64, e: T) -> CachedSlot<T> {
        CachedSlot { h, e }
    }
    #[inline(always)]
    fn elem(s: &CachedSlot<T>) -> &T {
        &s.e
    }
    #[inline(always)]
    fn elem_mut(s: &mut CachedSlot<T>) -> &mut T {
        &mut s.e
    }
    #[inline(always)]
    fn dissolve(s: CachedSlot<T>) -> T {
        s.e
    }
    #[inline(always)]
    fn stored(s: &CachedSlot<T>) -> u64 {
        s.h
    }
}

/*
    table configuration
*/

/// Everything that is fixed at instantiation time: the hasher, the group backend, the
/// collision/mix/cache policies and the load factor ratio. All of it monomorphizes; no
/// probe ever goes through an indirect call
pub trait Config<T: Element>: Sized + 'static {
    type Hasher: AsHasher;
    type Backend: Lane;
    type Probe: CollisionPolicy;
    type Mix: MixPolicy;
    type Cache: CachePolicy<T>;
    /// Load factor numerator. `LF_NUM / LF_DEN` must sit strictly inside (0, 1)
    const LF_NUM: usize = 7;
    const LF_DEN: usize = 8;
}

macro_rules! impl_config {
    ($($(#[$attr:meta])* $vis:vis $name:ident: $hasher:ty, $backend:ty, $probe:ty, $mix:ty, $cache:ty),* $(,)?) => {
        $($(#[$attr])* $vis struct $name;
        impl<T: $crate::flat::config::Element> $crate::flat::config::Config<T> for $name {
            type Hasher = $hasher;
            type Backend = $backend;
            type Probe = $probe;
            type Mix = $mix;
            type Cache = $cache;
        })*
    }
}
pub(crate) use impl_config;

impl_config! {
    /// The stock configuration: the bundled high-quality hasher (no extra mixing needed),
    /// quadratic probing, lean slots
    pub DefConfig: ahash::RandomState, crate::simd::NativeLane, Quadratic, Identity, RecomputeHash,
    /// Fx word hashing behind the murmur finalizer. Usually the fastest choice for small
    /// integer keys
    pub FxConfig: crate::meta::hash::HasherNativeFx, crate::simd::NativeLane, Quadratic, Mix, RecomputeHash,
    /// [`DefConfig`] with per-slot hash caching, for expensive-to-hash keys
    pub CachedConfig: ahash::RandomState, crate::simd::NativeLane, Quadratic, Identity, CacheHash,
    /// [`DefConfig`] with linear probing
    pub LinearConfig: ahash::RandomState, crate::simd::NativeLane, Linear, Identity, RecomputeHash,
}
