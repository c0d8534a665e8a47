/*
 * Created on Thu Apr 18 2024
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

use std::{alloc::Layout, mem};

/// Geometry of the single co-located table allocation:
/// ```text
/// [ctrl[0..ctrl_len]][pad to align_of(S)][slot[0..ctrl_len - 1]]
/// ```
/// The last control position is the sentinel, so there is one slot less than there are
/// control bytes. The whole region is aligned to `max(group_align, align_of(S))`, which
/// keeps group-wide loads of the control array aligned and the slot array correctly
/// aligned for `S`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableLayout {
    pub layout: Layout,
    pub slot_off: usize,
}

/// Offset of the slot region within a table buffer: the control length rounded up to the
/// slot alignment. Only for geometries already validated by [`flat_layout`]
#[inline(always)]
pub const fn slot_offset(ctrl_len: usize, slot_align: usize) -> usize {
    (ctrl_len + slot_align - 1) & !(slot_align - 1)
}

/// Compute the co-located layout for `ctrl_len` control bytes and `ctrl_len - 1` slots of
/// `S`. Returns `None` if any intermediate size overflows `usize` or violates [`Layout`]'s
/// contract
pub fn flat_layout<S>(ctrl_len: usize, group_align: usize) -> Option<TableLayout> {
    debug_assert!(ctrl_len.is_power_of_two(), "ctrl region not group-aligned");
    debug_assert!(group_align.is_power_of_two());
    let slot_align = mem::align_of::<S>();
    let slot_off = ctrl_len.checked_add(slot_align - 1)? & !(slot_align - 1);
    let slot_bytes = mem::size_of::<S>().checked_mul(ctrl_len - 1)?;
    let size = slot_off.checked_add(slot_bytes)?;
    let align = if group_align > slot_align {
        group_align
    } else {
        slot_align
    };
    Layout::from_size_align(size, align)
        .ok()
        .map(|layout| TableLayout { layout, slot_off })
}

#[cfg(test)]
mod tests {
    use super::flat_layout;

    #[test]
    fn packed_slots_need_no_padding() {
        let tl = flat_layout::<u8>(16, 16).unwrap();
        assert_eq!(tl.slot_off, 16);
        assert_eq!(tl.layout.size(), 16 + 15);
        assert_eq!(tl.layout.align(), 16);
    }

    #[test]
    fn wide_slots_get_aligned() {
        #[repr(align(32))]
        struct Wide([u8; 64]);
        let tl = flat_layout::<Wide>(16, 16).unwrap();
        assert_eq!(tl.slot_off, 32);
        assert_eq!(tl.layout.align(), 32);
        assert_eq!(tl.layout.size(), 32 + 15 * 64);
    }

    #[test]
    fn word_slots() {
        let tl = flat_layout::<u64>(64, 16).unwrap();
        assert_eq!(tl.slot_off, 64);
        assert_eq!(tl.layout.size(), 64 + 63 * 8);
        assert_eq!(tl.layout.align(), 16);
    }

    #[test]
    fn overflow_is_rejected() {
        assert!(flat_layout::<[u64; 1024]>(1 << 62, 16).is_none());
    }
}
