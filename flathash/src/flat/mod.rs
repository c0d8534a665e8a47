/*
 * Created on Tue May 21 2024
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

#![deny(unreachable_patterns)]

pub mod config;
pub mod imp;
pub(super) mod iter;
#[cfg(test)]
mod tests;

use {
    self::config::{CachePolicy, CollisionPolicy, Config, Element, MixPolicy},
    crate::{
        mem::{layout, unsafe_apis},
        meta::Comparable,
        simd::Lane,
    },
    std::{
        alloc::Layout,
        hash::{BuildHasher, Hash, Hasher},
        marker::PhantomData,
        mem, ptr,
    },
};

/*
    flat table impl
    ---
    One allocation, two regions: a byte of control state per slot, then the slots. The
    control byte encodes empty/deleted/sentinel in the top-bit-set space and a 7-bit
    fragment of the element's hash (h2) in the top-bit-clear space, so "is this lane
    live" is a single bit test and "could this lane be my key" is a byte compare that the
    backend answers for a whole group per load. The remaining bits of the hash (h1) pick
    the group where probing starts.

    Erase is the only subtle state transition: a slot whose group still has an empty lane
    can become empty again (no probe for any key ever crossed this group without
    stopping), otherwise it must leave a tombstone so that keys which overflowed past
    this group remain reachable. Since probing is aligned-group based, the group-local
    check is exact, not conservative.

    -- Sayan (@ohsayan) // May '24
*/

/// Never held an element; terminates probing
pub(crate) const CTRL_EMPTY: u8 = 0b1000_0000;
/// Tombstone; probing skips, insertion may reuse
pub(crate) const CTRL_DELETED: u8 = 0b1111_1110;
/// One byte past the last slot; terminates iteration
pub(crate) const CTRL_SENTINEL: u8 = 0b1111_1111;

#[inline(always)]
pub(crate) const fn is_full(b: u8) -> bool {
    b & 0x80 == 0
}

#[inline(always)]
const fn h1(h: u64) -> usize {
    (h >> 7) as usize
}

#[inline(always)]
const fn h2(h: u64) -> u8 {
    (h & 0x7F) as u8
}

pub(crate) type SlotOf<T, C> = <<C as Config<T>>::Cache as CachePolicy<T>>::Slot;

#[cfg(debug_assertions)]
/// Debug-build counters for the things a caller can't otherwise observe: rehashes and
/// live tombstones
pub struct FlatTableMetrics {
    stat_rehash: usize,
    stat_tomb: usize,
}

#[cfg(debug_assertions)]
impl FlatTableMetrics {
    const fn new() -> Self {
        Self {
            stat_rehash: 0,
            stat_tomb: 0,
        }
    }
    #[cfg(test)]
    pub const fn raw_rehash(&self) -> usize {
        self.stat_rehash
    }
    #[cfg(test)]
    pub const fn raw_tomb(&self) -> usize {
        self.stat_tomb
    }
}

/// The result of walking the probe sequence for an insert candidate
enum ProbeEnd {
    /// The key is already present at this slot
    Found(usize),
    /// The key is absent; place it at this slot. `fresh` is set when the slot is empty
    /// (as opposed to a reused tombstone)
    Place { i: usize, fresh: bool },
}

/// The flat table core. `groups == 0` (null buffer) is the uninitialized state; the
/// first insert or reserve allocates. All key access goes through [`Element::key`]; the
/// facades in [`imp`] decide what an element is
pub(crate) struct RawTable<T: Element, C: Config<T>> {
    b: *mut u8,
    groups: usize,
    len: usize,
    growth: usize,
    h: C::Hasher,
    #[cfg(debug_assertions)]
    m: FlatTableMetrics,
    _t: PhantomData<T>,
}

// UNSAFE(@ohsayan): the raw buffer is exclusively owned; sendability reduces to the
// slot contents and the hasher state
unsafe impl<T: Element, C: Config<T>> Send for RawTable<T, C>
where
    SlotOf<T, C>: Send,
    C::Hasher: Send,
{
}
unsafe impl<T: Element, C: Config<T>> Sync for RawTable<T, C>
where
    SlotOf<T, C>: Sync,
    C::Hasher: Sync,
{
}

struct BufGuard {
    b: *mut u8,
    l: Layout,
}

impl Drop for BufGuard {
    fn drop(&mut self) {
        unsafe {
            // UNSAFE(@ohsayan): region came from alloc_layout with this exact layout and
            // holds no element anyone else owns
            unsafe_apis::dealloc_layout(self.b, self.l)
        }
    }
}

impl<T: Element, C: Config<T>> RawTable<T, C> {
    const LANES: usize = C::Backend::WIDTH;

    #[inline(always)]
    const fn _new(h: C::Hasher) -> Self {
        Self {
            b: ptr::null_mut(),
            groups: 0,
            len: 0,
            growth: 0,
            h,
            #[cfg(debug_assertions)]
            m: FlatTableMetrics::new(),
            _t: PhantomData,
        }
    }
    #[inline(always)]
    pub(crate) fn _new_default() -> Self {
        Self::_new(C::Hasher::default())
    }
    #[inline(always)]
    pub(crate) fn _with_capacity(n: usize) -> Self {
        let mut slf = Self::_new_default();
        if n != 0 {
            slf._reserve(n);
        }
        slf
    }
    #[inline(always)]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }
    #[inline(always)]
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }
    #[inline(always)]
    const fn ctrl_len(&self) -> usize {
        self.groups * Self::LANES
    }
    #[inline(always)]
    pub(crate) const fn capacity(&self) -> usize {
        if self.groups == 0 {
            0
        } else {
            self.ctrl_len() - 1
        }
    }
    #[cfg(debug_assertions)]
    #[inline(always)]
    pub(crate) const fn metrics(&self) -> &FlatTableMetrics {
        &self.m
    }
}

// geometry and sizing
impl<T: Element, C: Config<T>> RawTable<T, C> {
    /// Largest live count the given capacity may hold: `floor(cap × LF)`
    fn max_load(cap: usize) -> usize {
        ((cap as u128 * C::LF_NUM as u128) / C::LF_DEN as u128) as usize
    }
    /// Smallest capacity whose load limit fits `n` elements: `ceil(n / LF)`
    fn capacity_for(n: usize) -> usize {
        ((n as u128 * C::LF_DEN as u128 + (C::LF_NUM as u128 - 1)) / C::LF_NUM as u128) as usize
    }
    /// Smallest power-of-two group count providing at least `cap` slots
    fn groups_for(cap: usize) -> usize {
        let min_ctrl = match cap.checked_add(1) {
            Some(c) => c,
            None => panic!("capacity overflow"),
        };
        min_ctrl.div_ceil(Self::LANES).next_power_of_two()
    }
    fn current_layout(&self) -> layout::TableLayout {
        debug_assert!(!self.b.is_null());
        layout::flat_layout::<SlotOf<T, C>>(self.ctrl_len(), Self::LANES)
            .expect("logic,live table with invalid layout")
    }
    #[inline(always)]
    fn slot_off(&self) -> usize {
        layout::slot_offset(self.ctrl_len(), mem::align_of::<SlotOf<T, C>>())
    }
}

// raw access
impl<T: Element, C: Config<T>> RawTable<T, C> {
    #[inline(always)]
    pub(crate) const fn ctrl_base(&self) -> *const u8 {
        self.b
    }
    #[inline(always)]
    pub(crate) const fn group_ct(&self) -> usize {
        self.groups
    }
    /// ## Safety
    /// Table must be initialized
    #[inline(always)]
    pub(crate) unsafe fn slots_base(&self) -> *const SlotOf<T, C> {
        self.b.add(self.slot_off()) as *const _
    }
    /// ## Safety
    /// `i < ctrl_len`
    #[inline(always)]
    unsafe fn ctrl_at(&self, i: usize) -> u8 {
        debug_assert!(i < self.ctrl_len());
        *self.b.add(i)
    }
    /// ## Safety
    /// `i < capacity` (the sentinel is not writable through this)
    #[inline(always)]
    unsafe fn set_ctrl(&mut self, i: usize, b: u8) {
        debug_assert!(i < self.capacity());
        *self.b.add(i) = b;
    }
    /// ## Safety
    /// `i < capacity`
    #[inline(always)]
    unsafe fn slot_ptr(&self, i: usize) -> *mut SlotOf<T, C> {
        debug_assert!(i < self.capacity());
        (self.b.add(self.slot_off()) as *mut SlotOf<T, C>).add(i)
    }
    /// ## Safety
    /// `base` must be a group-aligned offset within `ctrl_len`
    #[inline(always)]
    unsafe fn load_group(&self, base: usize) -> C::Backend {
        debug_assert!(base % Self::LANES == 0 && base < self.ctrl_len());
        C::Backend::load(self.b.add(base))
    }
    /// ## Safety
    /// `i` must hold a live element
    #[inline(always)]
    pub(crate) unsafe fn elem_at(&self, i: usize) -> &T {
        debug_assert!(is_full(self.ctrl_at(i)));
        C::Cache::elem(&*self.slot_ptr(i))
    }
    /// ## Safety
    /// `i` must hold a live element
    #[inline(always)]
    pub(crate) unsafe fn elem_mut_at(&mut self, i: usize) -> &mut T {
        debug_assert!(is_full(self.ctrl_at(i)));
        C::Cache::elem_mut(&mut *self.slot_ptr(i))
    }
}

// metrics plumbing
impl<T: Element, C: Config<T>> RawTable<T, C> {
    #[inline(always)]
    fn metrics_rehash_incr(&mut self) {
        #[cfg(debug_assertions)]
        {
            self.m.stat_rehash += 1;
        }
    }
    #[inline(always)]
    fn metrics_tomb_incr(&mut self) {
        #[cfg(debug_assertions)]
        {
            self.m.stat_tomb += 1;
        }
    }
    #[inline(always)]
    fn metrics_tomb_decr(&mut self) {
        #[cfg(debug_assertions)]
        {
            self.m.stat_tomb -= 1;
        }
    }
    #[inline(always)]
    fn metrics_tomb_reset(&mut self) {
        #[cfg(debug_assertions)]
        {
            self.m.stat_tomb = 0;
        }
    }
}

// hashing
impl<T: Element, C: Config<T>> RawTable<T, C> {
    fn hash_key<Q: ?Sized + Hash>(&self, k: &Q) -> u64 {
        let mut state = self.h.build_hasher();
        k.hash(&mut state);
        C::Mix::fin(state.finish())
    }
    #[inline(always)]
    fn hash_elem(&self, e: &T) -> u64 {
        self.hash_key(e.key())
    }
}

// the state machine
impl<T: Element, C: Config<T>> RawTable<T, C> {
    pub(crate) fn _contains<Q>(&self, k: &Q) -> bool
    where
        Q: ?Sized + Comparable<T::Key>,
    {
        self._find(k).is_some()
    }
    pub(crate) fn _find<Q>(&self, k: &Q) -> Option<usize>
    where
        Q: ?Sized + Comparable<T::Key>,
    {
        if self.groups == 0 {
            return None;
        }
        let h = self.hash_key(k);
        let mask = self.groups - 1;
        let frag = h2(h);
        let mut probe = C::Probe::begin(h1(h) & mask);
        loop {
            let base = probe.group() * Self::LANES;
            let ld = unsafe {
                // UNSAFE(@ohsayan): probe groups are in-range by construction (masked)
                self.load_group(base)
            };
            for lane in ld.matches(frag).bits() {
                let i = base + lane;
                let e = unsafe {
                    // UNSAFE(@ohsayan): fragment match ⇒ top bit clear ⇒ live slot
                    self.elem_at(i)
                };
                if k.cmp_eq(e.key()) {
                    return Some(i);
                }
            }
            if ld.matches(CTRL_EMPTY).any() {
                return None;
            }
            probe.advance(mask);
        }
    }
    /// Walk the probe sequence for `k`. Remembers the earliest tombstone on the path so
    /// that, if the key turns out absent, the element reuses it instead of lengthening
    /// the chain
    fn _probe_insert(&self, h: u64, k: &T::Key) -> ProbeEnd {
        let mask = self.groups - 1;
        let frag = h2(h);
        let mut probe = C::Probe::begin(h1(h) & mask);
        let mut tomb = None;
        loop {
            let base = probe.group() * Self::LANES;
            let ld = unsafe {
                // UNSAFE(@ohsayan): masked group index
                self.load_group(base)
            };
            for lane in ld.matches(frag).bits() {
                let i = base + lane;
                let e = unsafe {
                    // UNSAFE(@ohsayan): fragment match ⇒ live slot
                    self.elem_at(i)
                };
                if k.cmp_eq(e.key()) {
                    return ProbeEnd::Found(i);
                }
            }
            if tomb.is_none() {
                tomb = ld.matches(CTRL_DELETED).first().map(|l| base + l);
            }
            if let Some(l) = ld.matches(CTRL_EMPTY).first() {
                return match tomb {
                    Some(t) => ProbeEnd::Place { i: t, fresh: false },
                    None => ProbeEnd::Place {
                        i: base + l,
                        fresh: true,
                    },
                };
            }
            probe.advance(mask);
        }
    }
    /// Insert `e` if its key is absent. Returns the slot index and whether an insert
    /// happened; on a duplicate the candidate is simply dropped
    pub(crate) fn _insert(&mut self, e: T) -> (usize, bool) {
        if self.groups == 0 {
            self._resize(Self::groups_for(Self::capacity_for(1)));
        }
        let h = self.hash_elem(&e);
        loop {
            match self._probe_insert(h, e.key()) {
                ProbeEnd::Found(i) => return (i, false),
                ProbeEnd::Place { i, fresh } => {
                    // check-before-place: growing first means the candidate is written
                    // exactly once, into the final buffer
                    if fresh && self.growth == 0 {
                        self._resize(Self::groups_for(Self::capacity_for(self.len + 1)));
                        continue;
                    }
                    unsafe {
                        // UNSAFE(@ohsayan): probe handed us a non-full slot in range
                        self.place(i, h, e)
                    };
                    if fresh {
                        self.growth -= 1;
                    } else {
                        self.metrics_tomb_decr();
                    }
                    self.len += 1;
                    return (i, true);
                }
            }
        }
    }
    /// Insert or replace. Returns the previous value for a duplicate key
    pub(crate) fn _upsert(&mut self, e: T) -> Option<T::Value> {
        if self.groups == 0 {
            self._resize(Self::groups_for(Self::capacity_for(1)));
        }
        let h = self.hash_elem(&e);
        loop {
            match self._probe_insert(h, e.key()) {
                ProbeEnd::Found(i) => {
                    let old = unsafe {
                        // UNSAFE(@ohsayan): live slot; equal keys ⇒ identical h2, so the
                        // control byte needs no touch-up
                        ptr::replace(self.slot_ptr(i), C::Cache::form(h, e))
                    };
                    return Some(C::Cache::dissolve(old).into_val());
                }
                ProbeEnd::Place { i, fresh } => {
                    if fresh && self.growth == 0 {
                        self._resize(Self::groups_for(Self::capacity_for(self.len + 1)));
                        continue;
                    }
                    unsafe {
                        // UNSAFE(@ohsayan): see _insert
                        self.place(i, h, e)
                    };
                    if fresh {
                        self.growth -= 1;
                    } else {
                        self.metrics_tomb_decr();
                    }
                    self.len += 1;
                    return None;
                }
            }
        }
    }
    /// ## Safety
    /// `i` must be a non-full slot in range
    #[inline(always)]
    unsafe fn place(&mut self, i: usize, h: u64, e: T) {
        self.set_ctrl(i, h2(h));
        ptr::write(self.slot_ptr(i), C::Cache::form(h, e));
    }
    /// Remove the element at `i` and hand it back
    ///
    /// ## Safety
    /// `i` must hold a live element
    pub(crate) unsafe fn _erase_index(&mut self, i: usize) -> T {
        debug_assert!(is_full(self.ctrl_at(i)));
        let e = C::Cache::dissolve(ptr::read(self.slot_ptr(i)));
        let base = (i / Self::LANES) * Self::LANES;
        if self.load_group(base).matches(CTRL_EMPTY).any() {
            // no probe for any key ever crossed this group, so the slot can go back to
            // terminating probes
            self.set_ctrl(i, CTRL_EMPTY);
            self.growth += 1;
        } else {
            self.set_ctrl(i, CTRL_DELETED);
            self.metrics_tomb_incr();
        }
        self.len -= 1;
        e
    }
    pub(crate) fn _remove<Q>(&mut self, k: &Q) -> Option<T>
    where
        Q: ?Sized + Comparable<T::Key>,
    {
        self._find(k).map(|i| unsafe {
            // UNSAFE(@ohsayan): find only returns live slots
            self._erase_index(i)
        })
    }
    pub(crate) fn _reserve(&mut self, n: usize) {
        let cap = Self::capacity_for(n);
        if cap > self.capacity() {
            self._resize(Self::groups_for(cap));
        }
    }
    pub(crate) fn _clear(&mut self) {
        if self.b.is_null() {
            return;
        }
        unsafe {
            // UNSAFE(@ohsayan): nullck above; ctrl walk stays below capacity
            if mem::needs_drop::<SlotOf<T, C>>() {
                for i in 0..self.capacity() {
                    if is_full(self.ctrl_at(i)) {
                        unsafe_apis::drop_in_place(self.slot_ptr(i));
                    }
                }
            }
            unsafe_apis::dealloc_layout(self.b, self.current_layout().layout);
        }
        self.b = ptr::null_mut();
        self.groups = 0;
        self.len = 0;
        self.growth = 0;
        self.metrics_tomb_reset();
    }
    pub(crate) fn _iter(&self) -> iter::RawIter<'_, T, C> {
        iter::RawIter::new(self)
    }
}

// rehash
impl<T: Element, C: Config<T>> RawTable<T, C> {
    /// First empty lane of the first group (in probe order) with one, over a foreign
    /// control region. Used for unchecked relocation: the source table already
    /// guarantees key uniqueness
    ///
    /// ## Safety
    /// `ctrl` must be a valid control region of `(mask + 1) * WIDTH` bytes
    unsafe fn probe_free(ctrl: *const u8, mask: usize, h: u64) -> usize {
        let mut probe = C::Probe::begin(h1(h) & mask);
        loop {
            let base = probe.group() * Self::LANES;
            let ld = C::Backend::load(ctrl.add(base));
            if let Some(l) = ld.matches(CTRL_EMPTY).first() {
                return base + l;
            }
            probe.advance(mask);
        }
    }
    /// Move the table into a fresh buffer of `new_groups` groups. Tombstones evaporate;
    /// the growth budget is recomputed. Panic-neutral: if a hash recomputation panics
    /// mid-relocation, the old buffer (which still owns every element — relocation is a
    /// bitwise copy and the old control bytes are untouched) stays live and the new
    /// region is released without running any drops
    fn _resize(&mut self, new_groups: usize) {
        debug_assert!(new_groups.is_power_of_two());
        let new_ctrl_len = match new_groups.checked_mul(Self::LANES) {
            Some(l) => l,
            None => panic!("capacity overflow"),
        };
        let tl = match layout::flat_layout::<SlotOf<T, C>>(new_ctrl_len, Self::LANES) {
            Some(tl) => tl,
            None => panic!("capacity overflow"),
        };
        let nbuf: *mut u8 = unsafe {
            // UNSAFE(@ohsayan): nonzero, checked layout
            unsafe_apis::alloc_layout(tl.layout)
        };
        unsafe {
            // UNSAFE(@ohsayan): fresh region of at least new_ctrl_len bytes
            unsafe_apis::fill_bytes(nbuf, CTRL_EMPTY, new_ctrl_len);
            *nbuf.add(new_ctrl_len - 1) = CTRL_SENTINEL;
        }
        let guard = BufGuard {
            b: nbuf,
            l: tl.layout,
        };
        if !self.b.is_null() {
            let nmask = new_groups - 1;
            let nslots = unsafe { nbuf.add(tl.slot_off) as *mut SlotOf<T, C> };
            for i in 0..self.capacity() {
                let c = unsafe {
                    // UNSAFE(@ohsayan): i < capacity < ctrl_len
                    self.ctrl_at(i)
                };
                if !is_full(c) {
                    continue;
                }
                unsafe {
                    // UNSAFE(@ohsayan): live slot. The copy is the move (everything is
                    // trivially relocatable here); ownership transfers to the new region
                    // only once the whole loop has run and the old buffer is freed
                    // without drops
                    let sp = self.slot_ptr(i);
                    let h = if C::Cache::CACHED {
                        C::Cache::stored(&*sp)
                    } else {
                        self.hash_elem(C::Cache::elem(&*sp))
                    };
                    let j = Self::probe_free(nbuf, nmask, h);
                    *nbuf.add(j) = h2(h);
                    ptr::copy_nonoverlapping(sp, nslots.add(j), 1);
                }
            }
            unsafe {
                // UNSAFE(@ohsayan): every live slot now has its bits in the new region;
                // freeing raw memory only, no drops
                unsafe_apis::dealloc_layout(self.b, self.current_layout().layout);
            }
        }
        mem::forget(guard);
        self.b = nbuf;
        self.groups = new_groups;
        self.growth = Self::max_load(new_ctrl_len - 1) - self.len;
        self.metrics_rehash_incr();
        self.metrics_tomb_reset();
    }
}

impl<T: Element, C: Config<T>> Drop for RawTable<T, C> {
    fn drop(&mut self) {
        self._clear()
    }
}

impl<T: Element + Clone, C: Config<T>> Clone for RawTable<T, C> {
    fn clone(&self) -> Self {
        // a fresh default hasher state, with every element re-inserted under it; if any
        // clone panics the partial table unwinds through its own Drop
        let mut slf = Self::_with_capacity(self.len);
        for e in self._iter() {
            let _ = slf._insert(e.clone());
        }
        slf
    }
}

#[cfg(test)]
// structural invariant checks, test builds only
impl<T: Element, C: Config<T>> RawTable<T, C> {
    /// Walk the control region and assert every structural invariant. Quadratic-ish in
    /// the worst case; only ever run from tests
    pub(crate) fn verify_integrity(&self) {
        if self.b.is_null() {
            assert_eq!(self.groups, 0);
            assert_eq!(self.len, 0);
            assert_eq!(self.growth, 0);
            return;
        }
        assert!(self.groups.is_power_of_two());
        let mut fulls = 0;
        let mut deleted = 0;
        for i in 0..self.ctrl_len() {
            let c = unsafe { self.ctrl_at(i) };
            if i == self.capacity() {
                assert_eq!(c, CTRL_SENTINEL, "sentinel missing at capacity");
                continue;
            }
            assert_ne!(c, CTRL_SENTINEL, "stray sentinel at {i}");
            if c == CTRL_DELETED {
                deleted += 1;
                continue;
            }
            if !is_full(c) {
                assert_eq!(c, CTRL_EMPTY, "undefined control byte {c:#x} at {i}");
                continue;
            }
            fulls += 1;
            let e = unsafe { self.elem_at(i) };
            let h = self.hash_elem(e);
            assert_eq!(c, h2(h), "fragment mismatch at {i}");
            if C::Cache::CACHED {
                assert_eq!(
                    unsafe { C::Cache::stored(&*self.slot_ptr(i)) },
                    h,
                    "stale cached hash at {i}"
                );
            }
            assert!(self.reprobe_hits(h, i), "unreachable element at {i}");
        }
        assert_eq!(fulls, self.len, "live count drift");
        assert_eq!(
            Self::max_load(self.capacity()) - self.len - deleted,
            self.growth,
            "growth budget drift"
        );
    }
    /// True iff a probe for hash `h` reaches slot `target`'s group before any group that
    /// would terminate the search
    fn reprobe_hits(&self, h: u64, target: usize) -> bool {
        let mask = self.groups - 1;
        let mut probe = C::Probe::begin(h1(h) & mask);
        let mut left = self.groups;
        while left != 0 {
            let g = probe.group();
            if g == target / Self::LANES {
                return true;
            }
            let ld = unsafe { self.load_group(g * Self::LANES) };
            if ld.matches(CTRL_EMPTY).any() {
                return false;
            }
            probe.advance(mask);
            left -= 1;
        }
        false
    }
}
