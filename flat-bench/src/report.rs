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

use {crate::error::BResult, serde::Serialize};

#[derive(Serialize)]
pub struct Report {
    workload: &'static str,
    ops: usize,
    total_nanos: u128,
    nanos_per_op: f64,
    ops_per_sec: f64,
}

impl Report {
    pub fn new(workload: &'static str, ops: usize, total_nanos: u128) -> Self {
        let nanos_per_op = total_nanos as f64 / ops as f64;
        Self {
            workload,
            ops,
            total_nanos,
            nanos_per_op,
            ops_per_sec: 1_000_000_000.0 / nanos_per_op,
        }
    }
}

pub fn emit(reports: &[Report], json: bool) -> BResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
        return Ok(());
    }
    println!("{:<12} {:>12} {:>14} {:>14}", "workload", "ops", "ns/op", "ops/sec");
    for r in reports {
        println!(
            "{:<12} {:>12} {:>14.2} {:>14.0}",
            r.workload, r.ops, r.nanos_per_op, r.ops_per_sec
        );
    }
    Ok(())
}
