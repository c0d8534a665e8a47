/*
 * Created on Fri Mar 15 2024
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

pub mod hash;

use core::{
    borrow::Borrow,
    hash::{BuildHasher, Hash},
};

pub trait AsHasher: BuildHasher + Default {}
impl<T> AsHasher for T where T: BuildHasher + Default {}

/// The [`Comparable`] trait is like [`PartialEq`], but is different due to its expectations. It exists so that
/// lookups can be run with any borrowed form of a key without first materializing the owned key type
/// (a transparent comparator, in the classical sense)
///
/// The contract is the usual one: if `Q: Comparable<K>` then `hash(q) == hash(k)` must hold whenever
/// `q.cmp_eq(k)` does. The blanket impl below derives this from [`Borrow`], which already promises as much
pub trait Comparable<K: ?Sized>: Hash {
    fn cmp_eq(&self, key: &K) -> bool;
}

impl<K: Borrow<T>, T: Eq + Hash + ?Sized> Comparable<K> for T {
    fn cmp_eq(&self, key: &K) -> bool {
        self == key.borrow()
    }
}
