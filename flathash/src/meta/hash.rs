/*
 * Created on Wed Mar 27 2024
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

use std::hash::{BuildHasher, Hasher};

pub type HasherNativeFx = HasherRawFx;

const ROTATE: u32 = 5;
const PRIME64: u64 = 0x517CC1B727220A95; // archimedes (obtained from rustc)

#[inline(always)]
fn fold64(state: u64, word: u64) -> u64 {
    (state.rotate_left(ROTATE) ^ word).wrapping_mul(PRIME64)
}

/// The 64-bit finalizer from MurmurHash3. Full avalanche over the word; this is what the
/// `Mix` policy runs before the h1/h2 split so that fx-style hashers (which leave the
/// upper bits poorly scrambled) still spread across groups
#[inline(always)]
pub const fn mix64(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xFF51AFD7ED558CCD);
    h ^= h >> 33;
    h = h.wrapping_mul(0xC4CEB9FE1A85EC53);
    h ^= h >> 33;
    h
}

/// An fx-style word-folding hasher. Extremely cheap on word-sized keys, but the upper
/// bits carry little entropy; pair it with the `Mix` policy, never `Identity`
#[derive(Debug, Clone)]
pub struct HasherRawFx(u64);

impl HasherRawFx {
    pub const fn new() -> Self {
        Self(0)
    }
}

impl Hasher for HasherRawFx {
    fn finish(&self) -> u64 {
        self.0
    }
    fn write(&mut self, mut bytes: &[u8]) {
        let mut state = self.0;
        while bytes.len() >= 8 {
            state = fold64(
                state,
                u64::from_ne_bytes([
                    bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
                ]),
            );
            bytes = &bytes[8..];
        }
        if bytes.len() >= 4 {
            state = fold64(
                state,
                u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as u64,
            );
            bytes = &bytes[4..];
        }
        if bytes.len() >= 2 {
            state = fold64(state, u16::from_ne_bytes([bytes[0], bytes[1]]) as u64);
            bytes = &bytes[2..];
        }
        if !bytes.is_empty() {
            state = fold64(state, bytes[0] as u64);
        }
        self.0 = state;
    }
    fn write_u8(&mut self, i: u8) {
        self.0 = fold64(self.0, i as u64);
    }
    fn write_u16(&mut self, i: u16) {
        self.0 = fold64(self.0, i as u64);
    }
    fn write_u32(&mut self, i: u32) {
        self.0 = fold64(self.0, i as u64);
    }
    fn write_u64(&mut self, i: u64) {
        self.0 = fold64(self.0, i);
    }
    fn write_u128(&mut self, i: u128) {
        let [a, b]: [u64; 2] = unsafe {
            // UNSAFE(@ohsayan): same size, no invalid bit patterns for integer types
            core::mem::transmute(i)
        };
        self.0 = fold64(fold64(self.0, a), b);
    }
    fn write_usize(&mut self, i: usize) {
        self.0 = fold64(self.0, i as u64);
    }
}

impl BuildHasher for HasherRawFx {
    type Hasher = Self;

    fn build_hasher(&self) -> Self::Hasher {
        Self::new()
    }
}

impl Default for HasherRawFx {
    fn default() -> Self {
        Self::new()
    }
}

/// A pass-through hasher for keys that are already high-quality hashes (or for tests that
/// need full control over placement). The last word written wins; byte streams are folded
/// since identity has no meaning for them
#[derive(Debug, Clone)]
pub struct HasherRawIdentity(u64);

impl HasherRawIdentity {
    pub const fn new() -> Self {
        Self(0)
    }
}

impl Hasher for HasherRawIdentity {
    fn finish(&self) -> u64 {
        self.0
    }
    fn write(&mut self, bytes: &[u8]) {
        let mut state = self.0;
        for b in bytes {
            state = fold64(state, *b as u64);
        }
        self.0 = state;
    }
    fn write_u8(&mut self, i: u8) {
        self.0 = i as u64;
    }
    fn write_u16(&mut self, i: u16) {
        self.0 = i as u64;
    }
    fn write_u32(&mut self, i: u32) {
        self.0 = i as u64;
    }
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }
    fn write_u128(&mut self, i: u128) {
        self.0 = i as u64;
    }
    fn write_usize(&mut self, i: usize) {
        self.0 = i as u64;
    }
}

impl BuildHasher for HasherRawIdentity {
    type Hasher = Self;

    fn build_hasher(&self) -> Self::Hasher {
        Self::new()
    }
}

impl Default for HasherRawIdentity {
    fn default() -> Self {
        Self::new()
    }
}
