/*
 * Created on Fri Jun 14 2024
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
    super::{
        config::{Config, DefConfig, Element, Pair, SetKey},
        iter::{FlatMapIterKV, FlatMapIterKey, FlatMapIterVal, FlatSetIter},
        RawTable,
    },
    crate::{AsKey, AsKeyClone, AsValueClone, IndexBaseSpec, NotFound, STIndex, STIndexSet},
    std::{borrow::Borrow, fmt, mem, ops},
};

/// A flat hash set: bare keys over the shared table core
pub struct FlatSet<K: AsKey, C: Config<SetKey<K>> = DefConfig> {
    t: RawTable<SetKey<K>, C>,
}

/// A flat hash map: key/value pairs over the shared table core. The key half of a pair
/// is immutable for as long as it lives in the map
pub struct FlatMap<K: AsKey, V, C: Config<Pair<K, V>> = DefConfig> {
    t: RawTable<Pair<K, V>, C>,
}

impl<K: AsKey, C: Config<SetKey<K>>> FlatSet<K, C> {
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            t: RawTable::_new_default(),
        }
    }
    #[inline(always)]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            t: RawTable::_with_capacity(n),
        }
    }
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.t.len()
    }
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.t.capacity()
    }
    pub fn clear(&mut self) {
        self.t._clear()
    }
    pub fn reserve(&mut self, n: usize) {
        self.t._reserve(n)
    }
    /// True if the key was absent (and is now stored); false drops the candidate
    pub fn insert(&mut self, key: K) -> bool {
        self.t._insert(SetKey::new(key)).1
    }
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        self.t._contains(key)
    }
    pub fn get<Q>(&self, key: &Q) -> Result<&K, NotFound>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        match self.t._find(key) {
            Some(i) => Ok(unsafe {
                // UNSAFE(@ohsayan): find only returns live slots
                self.t.elem_at(i).key()
            }),
            None => Err(NotFound),
        }
    }
    pub fn erase<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        self.t._remove(key).is_some()
    }
    pub fn try_erase<Q>(&mut self, key: &Q) -> Result<K, NotFound>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        self.t._remove(key).map(SetKey::into_inner).ok_or(NotFound)
    }
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other)
    }
    #[inline(always)]
    pub fn iter(&self) -> FlatSetIter<'_, K, C> {
        FlatSetIter::new(&self.t)
    }
}

impl<K: AsKey, C: Config<SetKey<K>>> IndexBaseSpec for FlatSet<K, C> {
    const PREALLOC: bool = true;

    #[cfg(debug_assertions)]
    type Metrics = super::FlatTableMetrics;

    fn idx_init() -> Self {
        Self::new()
    }
    fn idx_init_with(s: Self) -> Self {
        s
    }
    fn idx_init_cap(cap: usize) -> Self {
        Self::with_capacity(cap)
    }
    #[cfg(debug_assertions)]
    fn idx_metrics(&self) -> &Self::Metrics {
        self.t.metrics()
    }
}

impl<K: AsKey, C: Config<SetKey<K>>> STIndexSet<K> for FlatSet<K, C> {
    type IterKey<'a>
        = FlatSetIter<'a, K, C>
    where
        Self: 'a,
        K: 'a;

    fn st_len(&self) -> usize {
        self.len()
    }
    fn st_clear(&mut self) {
        self.clear()
    }
    fn st_reserve(&mut self, cap: usize) {
        self.reserve(cap)
    }
    fn st_insert(&mut self, key: K) -> bool {
        self.insert(key)
    }
    fn st_contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        self.contains(key)
    }
    fn st_get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        self.get(key).ok()
    }
    fn st_get_cloned<Q>(&self, key: &Q) -> Option<K>
    where
        K: AsKeyClone + Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        self.st_get(key).cloned()
    }
    fn st_delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        self.erase(key)
    }
    fn st_delete_return<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        self.try_erase(key).ok()
    }
    fn st_iter_key<'a>(&'a self) -> Self::IterKey<'a> {
        self.iter()
    }
}

impl<K: AsKey, C: Config<SetKey<K>>> Default for FlatSet<K, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: AsKeyClone, C: Config<SetKey<K>>> Clone for FlatSet<K, C> {
    fn clone(&self) -> Self {
        Self { t: self.t.clone() }
    }
}

impl<K: AsKey + fmt::Debug, C: Config<SetKey<K>>> fmt::Debug for FlatSet<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: AsKey, C: Config<SetKey<K>>> PartialEq for FlatSet<K, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|k| other.contains(k))
    }
}

impl<K: AsKey, C: Config<SetKey<K>>> FromIterator<K> for FlatSet<K, C> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut slf = Self::new();
        slf.extend(iter);
        slf
    }
}

impl<K: AsKey, C: Config<SetKey<K>>> Extend<K> for FlatSet<K, C> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        iter.into_iter().for_each(|k| {
            let _ = self.insert(k);
        })
    }
}

impl<'a, K: AsKey, C: Config<SetKey<K>>> IntoIterator for &'a FlatSet<K, C> {
    type Item = &'a K;
    type IntoIter = FlatSetIter<'a, K, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: AsKey, V, C: Config<Pair<K, V>>> FlatMap<K, V, C> {
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            t: RawTable::_new_default(),
        }
    }
    #[inline(always)]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            t: RawTable::_with_capacity(n),
        }
    }
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.t.len()
    }
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.t.capacity()
    }
    pub fn clear(&mut self) {
        self.t._clear()
    }
    pub fn reserve(&mut self, n: usize) {
        self.t._reserve(n)
    }
    /// True if the key was absent (and the pair is now stored)
    pub fn insert(&mut self, key: K, val: V) -> bool {
        self.t._insert(Pair::new(key, val)).1
    }
    /// Insert or replace; hands back the previous value for a duplicate key
    pub fn insert_or_assign(&mut self, key: K, val: V) -> Option<V> {
        self.t._upsert(Pair::new(key, val))
    }
    /// The value for `key`, inserting `V::default()` first if the key is absent
    pub fn entry_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let (i, _) = self.t._insert(Pair::new(key, V::default()));
        unsafe {
            // UNSAFE(@ohsayan): insert always leaves a live slot at i
            self.t.elem_mut_at(i).val_mut()
        }
    }
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        self.t._contains(key)
    }
    pub fn get<Q>(&self, key: &Q) -> Result<&V, NotFound>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        match self.t._find(key) {
            Some(i) => Ok(unsafe {
                // UNSAFE(@ohsayan): find only returns live slots
                self.t.elem_at(i).val()
            }),
            None => Err(NotFound),
        }
    }
    pub fn erase<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        self.t._remove(key).is_some()
    }
    pub fn try_erase<Q>(&mut self, key: &Q) -> Result<V, NotFound>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        self.t._remove(key).map(Pair::into_val).ok_or(NotFound)
    }
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other)
    }
    #[inline(always)]
    pub fn iter(&self) -> FlatMapIterKV<'_, K, V, C> {
        FlatMapIterKV::new(&self.t)
    }
    #[inline(always)]
    pub fn keys(&self) -> FlatMapIterKey<'_, K, V, C> {
        FlatMapIterKey::new(&self.t)
    }
    #[inline(always)]
    pub fn values(&self) -> FlatMapIterVal<'_, K, V, C> {
        FlatMapIterVal::new(&self.t)
    }
}

#[cfg(test)]
impl<K: AsKey, C: Config<SetKey<K>>> FlatSet<K, C> {
    pub(crate) fn raw(&self) -> &RawTable<SetKey<K>, C> {
        &self.t
    }
}

#[cfg(test)]
impl<K: AsKey, V, C: Config<Pair<K, V>>> FlatMap<K, V, C> {
    pub(crate) fn raw(&self) -> &RawTable<Pair<K, V>, C> {
        &self.t
    }
}

impl<K: AsKey, V, C: Config<Pair<K, V>>> IndexBaseSpec for FlatMap<K, V, C> {
    const PREALLOC: bool = true;

    #[cfg(debug_assertions)]
    type Metrics = super::FlatTableMetrics;

    fn idx_init() -> Self {
        Self::new()
    }
    fn idx_init_with(s: Self) -> Self {
        s
    }
    fn idx_init_cap(cap: usize) -> Self {
        Self::with_capacity(cap)
    }
    #[cfg(debug_assertions)]
    fn idx_metrics(&self) -> &Self::Metrics {
        self.t.metrics()
    }
}

impl<K: AsKey, V, C: Config<Pair<K, V>>> STIndex<K, V> for FlatMap<K, V, C> {
    type IterKV<'a>
        = FlatMapIterKV<'a, K, V, C>
    where
        Self: 'a,
        K: 'a,
        V: 'a;
    type IterKey<'a>
        = FlatMapIterKey<'a, K, V, C>
    where
        Self: 'a,
        K: 'a;
    type IterValue<'a>
        = FlatMapIterVal<'a, K, V, C>
    where
        Self: 'a,
        V: 'a;

    fn st_len(&self) -> usize {
        self.len()
    }
    fn st_clear(&mut self) {
        self.clear()
    }
    fn st_reserve(&mut self, cap: usize) {
        self.reserve(cap)
    }
    fn st_insert(&mut self, key: K, val: V) -> bool {
        self.insert(key, val)
    }
    fn st_upsert(&mut self, key: K, val: V) -> Option<V> {
        self.insert_or_assign(key, val)
    }
    fn st_contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        self.contains(key)
    }
    fn st_get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        self.get(key).ok()
    }
    fn st_get_cloned<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
        V: AsValueClone,
    {
        self.st_get(key).cloned()
    }
    fn st_get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        match self.t._find(key) {
            Some(i) => Some(unsafe {
                // UNSAFE(@ohsayan): find only returns live slots; only the value half is
                // ever handed out mutably
                self.t.elem_mut_at(i).val_mut()
            }),
            None => None,
        }
    }
    fn st_update<Q>(&mut self, key: &Q, val: V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        self.st_update_return(key, val).is_some()
    }
    fn st_update_return<Q>(&mut self, key: &Q, val: V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        match self.st_get_mut(key) {
            Some(v) => Some(mem::replace(v, val)),
            None => None,
        }
    }
    fn st_delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        self.erase(key)
    }
    fn st_delete_return<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + AsKey,
    {
        self.try_erase(key).ok()
    }
    fn st_iter_kv<'a>(&'a self) -> Self::IterKV<'a> {
        self.iter()
    }
    fn st_iter_key<'a>(&'a self) -> Self::IterKey<'a> {
        self.keys()
    }
    fn st_iter_value<'a>(&'a self) -> Self::IterValue<'a> {
        self.values()
    }
}

impl<K: AsKey, V, C: Config<Pair<K, V>>> Default for FlatMap<K, V, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: AsKeyClone, V: Clone, C: Config<Pair<K, V>>> Clone for FlatMap<K, V, C> {
    fn clone(&self) -> Self {
        Self { t: self.t.clone() }
    }
}

impl<K: AsKey + fmt::Debug, V: fmt::Debug, C: Config<Pair<K, V>>> fmt::Debug for FlatMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: AsKey, V: PartialEq, C: Config<Pair<K, V>>> PartialEq for FlatMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.st_get(k) == Some(v))
    }
}

impl<K: AsKey, V, C: Config<Pair<K, V>>> FromIterator<(K, V)> for FlatMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut slf = Self::new();
        slf.extend(iter);
        slf
    }
}

impl<K: AsKey, V, C: Config<Pair<K, V>>> Extend<(K, V)> for FlatMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        iter.into_iter().for_each(|(k, v)| {
            let _ = self.insert_or_assign(k, v);
        })
    }
}

impl<'a, K: AsKey, V, C: Config<Pair<K, V>>> IntoIterator for &'a FlatMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = FlatMapIterKV<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, Q, C> ops::Index<&Q> for FlatMap<K, V, C>
where
    K: AsKey + Borrow<Q>,
    Q: ?Sized + AsKey,
    C: Config<Pair<K, V>>,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}
