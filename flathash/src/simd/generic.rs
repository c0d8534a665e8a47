/*
 * Created on Thu May 2 2024
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
    super::{Bitmask, Lane},
    core::ptr,
};

/// Portable 16-lane fallback: a plain byte scan the optimizer is free to vectorize.
/// Always compiled (the backend-agreement tests run it against the native backend)
#[derive(Clone, Copy)]
pub struct LaneGeneric([u8; 16]);

impl Lane for LaneGeneric {
    const WIDTH: usize = 16;

    #[inline(always)]
    unsafe fn load(p: *const u8) -> Self {
        // UNSAFE(@ohsayan): caller promises WIDTH readable bytes; byte arrays are align(1)
        Self(ptr::read_unaligned(p as *const [u8; 16]))
    }
    #[inline(always)]
    fn matches(self, b: u8) -> Bitmask {
        let mut m = 0u64;
        let mut i = 0;
        while i < Self::WIDTH {
            m |= ((self.0[i] == b) as u64) << i;
            i += 1;
        }
        Bitmask::new(m)
    }
    #[inline(always)]
    fn mask_full(self) -> Bitmask {
        let mut m = 0u64;
        let mut i = 0;
        while i < Self::WIDTH {
            m |= (((self.0[i] & 0x80) == 0) as u64) << i;
            i += 1;
        }
        Bitmask::new(m)
    }
}
