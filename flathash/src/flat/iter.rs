/*
 * Created on Mon Jun 3 2024
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
        config::{CachePolicy, Config, Element, Pair, SetKey},
        RawTable, SlotOf, CTRL_SENTINEL,
    },
    crate::{
        simd::{Bitmask, Lane},
        AsKey,
    },
    core::{fmt, iter::FusedIterator, marker::PhantomData, ptr},
};

/// Walks live slots in layout order, one group-wide `full` mask at a time. The group
/// that carries the sentinel is the last one loaded, so the walk needs no bounds check:
/// when that group's mask runs dry the iterator is exhausted for good
pub(crate) struct RawIter<'a, T: Element, C: Config<T>> {
    ctrl: *const u8,
    slots: *const SlotOf<T, C>,
    base: usize,
    full: Bitmask,
    last: bool,
    left: usize,
    _l: PhantomData<&'a RawTable<T, C>>,
}

// UNSAFE(@ohsayan): the iterator only ever hands out shared refs, so both markers lower
// to the payload being shareable
unsafe impl<'a, T: Element + Sync, C: Config<T>> Send for RawIter<'a, T, C> where
    SlotOf<T, C>: Sync
{
}
unsafe impl<'a, T: Element + Sync, C: Config<T>> Sync for RawIter<'a, T, C> where
    SlotOf<T, C>: Sync
{
}

impl<'a, T: Element, C: Config<T>> RawIter<'a, T, C> {
    pub(crate) fn new(t: &'a RawTable<T, C>) -> Self {
        if t.group_ct() == 0 {
            return Self {
                ctrl: ptr::null(),
                slots: ptr::null(),
                base: 0,
                full: Bitmask::NONE,
                last: true,
                left: 0,
                _l: PhantomData,
            };
        }
        let ld = unsafe {
            // UNSAFE(@ohsayan): initialized table has at least one full group
            C::Backend::load(t.ctrl_base())
        };
        Self {
            ctrl: t.ctrl_base(),
            slots: unsafe {
                // UNSAFE(@ohsayan): nullck above
                t.slots_base()
            },
            base: 0,
            full: ld.mask_full(),
            last: ld.matches(CTRL_SENTINEL).any(),
            left: t.len(),
            _l: PhantomData,
        }
    }
}

impl<'a, T: Element, C: Config<T>> Iterator for RawIter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some(lane) = self.full.first() {
                self.full = self.full.without_lowest();
                self.left -= 1;
                return Some(unsafe {
                    // UNSAFE(@ohsayan): full mask ⇒ live slot; the borrow pins the table
                    C::Cache::elem(&*self.slots.add(self.base + lane))
                });
            }
            if self.last {
                return None;
            }
            self.base += C::Backend::WIDTH;
            let ld = unsafe {
                // UNSAFE(@ohsayan): the previous group was not the sentinel group, so
                // another full group of control bytes follows
                C::Backend::load(self.ctrl.add(self.base))
            };
            self.full = ld.mask_full();
            self.last = ld.matches(CTRL_SENTINEL).any();
        }
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.left, Some(self.left))
    }
}

impl<'a, T: Element, C: Config<T>> ExactSizeIterator for RawIter<'a, T, C> {
    fn len(&self) -> usize {
        self.left
    }
}

impl<'a, T: Element, C: Config<T>> FusedIterator for RawIter<'a, T, C> {}

impl<'a, T: Element, C: Config<T>> Clone for RawIter<'a, T, C> {
    fn clone(&self) -> Self {
        Self {
            ctrl: self.ctrl,
            slots: self.slots,
            base: self.base,
            full: self.full,
            last: self.last,
            left: self.left,
            _l: PhantomData,
        }
    }
}

macro_rules! delegate_iter_tail {
    ($name:ident over $elem:ident) => {
        impl<'a, K: AsKey, V, C: Config<$elem<K, V>>> ExactSizeIterator for $name<'a, K, V, C> {
            fn len(&self) -> usize {
                self.i.len()
            }
        }
        impl<'a, K: AsKey, V, C: Config<$elem<K, V>>> FusedIterator for $name<'a, K, V, C> {}
        impl<'a, K: AsKey, V, C: Config<$elem<K, V>>> Clone for $name<'a, K, V, C> {
            fn clone(&self) -> Self {
                Self { i: self.i.clone() }
            }
        }
    };
}

/// Borrowed iteration over a set's keys
pub struct FlatSetIter<'a, K: AsKey, C: Config<SetKey<K>>> {
    i: RawIter<'a, SetKey<K>, C>,
}

impl<'a, K: AsKey, C: Config<SetKey<K>>> FlatSetIter<'a, K, C> {
    #[inline(always)]
    pub(crate) fn new(t: &'a RawTable<SetKey<K>, C>) -> Self {
        Self { i: RawIter::new(t) }
    }
}

impl<'a, K: AsKey, C: Config<SetKey<K>>> Iterator for FlatSetIter<'a, K, C> {
    type Item = &'a K;

    #[inline(always)]
    fn next(&mut self) -> Option<&'a K> {
        self.i.next().map(SetKey::key)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.i.size_hint()
    }
}

impl<'a, K: AsKey, C: Config<SetKey<K>>> ExactSizeIterator for FlatSetIter<'a, K, C> {
    fn len(&self) -> usize {
        self.i.len()
    }
}

impl<'a, K: AsKey, C: Config<SetKey<K>>> FusedIterator for FlatSetIter<'a, K, C> {}

impl<'a, K: AsKey, C: Config<SetKey<K>>> Clone for FlatSetIter<'a, K, C> {
    fn clone(&self) -> Self {
        Self { i: self.i.clone() }
    }
}

impl<'a, K: AsKey + fmt::Debug, C: Config<SetKey<K>>> fmt::Debug for FlatSetIter<'a, K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// Borrowed iteration over a map's entries
pub struct FlatMapIterKV<'a, K: AsKey, V, C: Config<Pair<K, V>>> {
    i: RawIter<'a, Pair<K, V>, C>,
}

impl<'a, K: AsKey, V, C: Config<Pair<K, V>>> FlatMapIterKV<'a, K, V, C> {
    #[inline(always)]
    pub(crate) fn new(t: &'a RawTable<Pair<K, V>, C>) -> Self {
        Self { i: RawIter::new(t) }
    }
}

impl<'a, K: AsKey, V, C: Config<Pair<K, V>>> Iterator for FlatMapIterKV<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    #[inline(always)]
    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.i.next().map(|p| (p.key(), p.val()))
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.i.size_hint()
    }
}

delegate_iter_tail!(FlatMapIterKV over Pair);

impl<'a, K: AsKey + fmt::Debug, V: fmt::Debug, C: Config<Pair<K, V>>> fmt::Debug
    for FlatMapIterKV<'a, K, V, C>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.clone()).finish()
    }
}

/// Borrowed iteration over a map's keys
pub struct FlatMapIterKey<'a, K: AsKey, V, C: Config<Pair<K, V>>> {
    i: RawIter<'a, Pair<K, V>, C>,
}

impl<'a, K: AsKey, V, C: Config<Pair<K, V>>> FlatMapIterKey<'a, K, V, C> {
    #[inline(always)]
    pub(crate) fn new(t: &'a RawTable<Pair<K, V>, C>) -> Self {
        Self { i: RawIter::new(t) }
    }
}

impl<'a, K: AsKey, V, C: Config<Pair<K, V>>> Iterator for FlatMapIterKey<'a, K, V, C> {
    type Item = &'a K;

    #[inline(always)]
    fn next(&mut self) -> Option<&'a K> {
        self.i.next().map(Pair::key)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.i.size_hint()
    }
}

delegate_iter_tail!(FlatMapIterKey over Pair);

/// Borrowed iteration over a map's values
pub struct FlatMapIterVal<'a, K: AsKey, V, C: Config<Pair<K, V>>> {
    i: RawIter<'a, Pair<K, V>, C>,
}

impl<'a, K: AsKey, V, C: Config<Pair<K, V>>> FlatMapIterVal<'a, K, V, C> {
    #[inline(always)]
    pub(crate) fn new(t: &'a RawTable<Pair<K, V>, C>) -> Self {
        Self { i: RawIter::new(t) }
    }
}

impl<'a, K: AsKey, V, C: Config<Pair<K, V>>> Iterator for FlatMapIterVal<'a, K, V, C> {
    type Item = &'a V;

    #[inline(always)]
    fn next(&mut self) -> Option<&'a V> {
        self.i.next().map(Pair::val)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.i.size_hint()
    }
}

delegate_iter_tail!(FlatMapIterVal over Pair);
