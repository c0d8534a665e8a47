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

use {
    crate::error::{BResult, Error},
    clap::Parser,
};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Measure flathash index throughput (insert/lookup/update/iterate/erase)"
)]
pub struct Cli {
    #[arg(
        short = 'q',
        long = "queries",
        help = "Sets the number of keys each workload runs over",
        value_name = "COUNT",
        default_value_t = 1_000_000
    )]
    pub query_count: usize,

    #[arg(
        short = 's',
        long = "keysize",
        help = "Sets the size of the (string) keys",
        value_name = "BYTES",
        default_value_t = 8
    )]
    pub key_size: usize,

    #[arg(
        long = "seed",
        help = "Seed for the workload shuffle (random if unset)",
        value_name = "SEED"
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 'j',
        long = "json",
        help = "Sets output type to JSON",
        default_value_t = false
    )]
    pub json: bool,
}

/// Validated benchmark configuration
pub struct BenchConfig {
    pub query_count: usize,
    pub key_size: usize,
    pub seed: Option<u64>,
    pub json: bool,
}

impl Cli {
    pub fn validate(self) -> BResult<BenchConfig> {
        if self.query_count == 0 {
            return Err(Error::Config("query count must be nonzero".to_owned()));
        }
        if self.key_size == 0 || self.key_size > 1024 {
            return Err(Error::Config(
                "key size must be within 1..=1024 bytes".to_owned(),
            ));
        }
        if self.query_count > 10usize.pow(self.key_size.min(9) as u32) {
            return Err(Error::Config(format!(
                "{} distinct keys don't fit in {} bytes",
                self.query_count, self.key_size
            )));
        }
        Ok(BenchConfig {
            query_count: self.query_count,
            key_size: self.key_size,
            seed: self.seed,
            json: self.json,
        })
    }
}
