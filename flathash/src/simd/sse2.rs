/*
 * Created on Mon Apr 29 2024
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
    core::arch::x86_64::{
        __m128i, _mm_cmpeq_epi8, _mm_loadu_si128, _mm_movemask_epi8, _mm_set1_epi8,
    },
};

/// 16-lane group backend over SSE2, which is part of the x86_64 baseline (hence no runtime
/// detection)
#[derive(Clone, Copy)]
pub struct LaneSse2(__m128i);

impl Lane for LaneSse2 {
    const WIDTH: usize = 16;

    #[inline(always)]
    unsafe fn load(p: *const u8) -> Self {
        // UNSAFE(@ohsayan): caller promises WIDTH readable bytes; loadu has no alignment needs
        Self(_mm_loadu_si128(p as *const __m128i))
    }
    #[inline(always)]
    fn matches(self, b: u8) -> Bitmask {
        unsafe {
            // UNSAFE(@ohsayan): sse2 is unconditionally available on this target (cfg gated)
            let eq = _mm_cmpeq_epi8(self.0, _mm_set1_epi8(b as i8));
            Bitmask::new(_mm_movemask_epi8(eq) as u16 as u64)
        }
    }
    #[inline(always)]
    fn mask_full(self) -> Bitmask {
        unsafe {
            // UNSAFE(@ohsayan): see above. movemask extracts the top bits; full ⇔ top bit clear
            Bitmask::new(!(_mm_movemask_epi8(self.0) as u16) as u64)
        }
    }
}
