/*
 * Created on Tue Jun 25 2024
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

use std::fmt::Display;

pub type BResult<T> = Result<T, Error>;

/// Benchmark tool errors
pub enum Error {
    /// An error originating from the benchmark configuration
    Config(String),
    /// A runtime error
    Runtime(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config error: {}", e),
            Error::Runtime(e) => write!(f, "runtime error: {}", e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Runtime(format!("report serialization error: {}", e))
    }
}
