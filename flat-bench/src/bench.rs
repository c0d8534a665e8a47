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
    crate::{
        cli::BenchConfig,
        error::{BResult, Error},
        report::Report,
    },
    devtimer::DevTime,
    flathash::IndexSTFlatMap,
    rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng},
};

/// Zero-padded decimal keys: deterministic, distinct and of uniform length
fn key(current: usize, len: usize) -> String {
    format!("{:0>width$}", current, width = len)
}

fn time<R>(label: &'static str, count: usize, f: impl FnOnce() -> R) -> BResult<(R, Report)> {
    let mut dt = DevTime::new_simple();
    dt.start();
    let r = f();
    dt.stop();
    let nanos = dt
        .time_in_nanos()
        .ok_or_else(|| Error::Runtime(format!("timer failed for workload `{label}`")))?;
    info!(
        "workload `{}` finished: {} ops in {} ns",
        label, count, nanos
    );
    Ok((r, Report::new(label, count, nanos)))
}

pub fn run_bench(config: &BenchConfig) -> BResult<Vec<Report>> {
    let count = config.query_count;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::thread_rng().gen()),
    };
    info!(
        "generating {} keys of {} byte(s) each",
        count, config.key_size
    );
    let mut keys: Vec<String> = (0..count).map(|i| key(i, config.key_size)).collect();
    keys.shuffle(&mut rng);
    let misses: Vec<String> = (count..count * 2).map(|i| key(i, config.key_size)).collect();

    let mut reports = Vec::with_capacity(6);
    let mut m: IndexSTFlatMap<String, u64> = IndexSTFlatMap::new();

    let (_, r) = time("insert", count, || {
        for (i, k) in keys.iter().enumerate() {
            m.insert(k.clone(), i as u64);
        }
    })?;
    reports.push(r);
    if m.len() != count {
        return Err(Error::Runtime("insert workload lost keys".to_owned()));
    }

    let (hits, r) = time("lookup/hit", count, || {
        let mut hits = 0usize;
        for k in &keys {
            hits += m.contains(k.as_str()) as usize;
        }
        hits
    })?;
    reports.push(r);
    if hits != count {
        return Err(Error::Runtime("lookup workload missed keys".to_owned()));
    }

    let (misses_found, r) = time("lookup/miss", count, || {
        let mut found = 0usize;
        for k in &misses {
            found += m.contains(k.as_str()) as usize;
        }
        found
    })?;
    reports.push(r);
    if misses_found != 0 {
        return Err(Error::Runtime("miss workload found ghost keys".to_owned()));
    }

    let (_, r) = time("update", count, || {
        for k in &keys {
            m.insert_or_assign(k.clone(), 0);
        }
    })?;
    reports.push(r);

    let (sum, r) = time("iterate", count, || {
        m.values().copied().sum::<u64>()
    })?;
    reports.push(r);
    if sum != 0 {
        return Err(Error::Runtime("iterate workload saw stale values".to_owned()));
    }

    let (_, r) = time("erase", count, || {
        for k in &keys {
            m.erase(k.as_str());
        }
    })?;
    reports.push(r);
    if !m.is_empty() {
        return Err(Error::Runtime("erase workload left keys behind".to_owned()));
    }

    Ok(reports)
}
