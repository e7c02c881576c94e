//! Sparse double-array layout.
//!
//! Every frozen state gets a base offset in two shared arrays `sym` and
//! `nxt`. A transition on symbol `s` from a state based at `b` occupies
//! slot `b + s`; the slot belongs to that state exclusively, and
//! `sym[b + s] == s` is what the runtime probes. Base offsets are also
//! pairwise distinct, tracked in a second bitset.

use fixedbitset::FixedBitSet;

use crate::builder::StateRecord;
use crate::fsa::{Fsa, EMPTY_SLOT};

/// How far below the high-water mark the placement scan starts.
/// Smaller values waste slots, larger ones only slow the scan down.
const SEARCH_OFFSET: usize = 512;

struct Packer {
    slot_used: FixedBitSet,
    origin_used: FixedBitSet,
    frontier: usize,
    max_offset: usize,
}

impl Packer {
    fn new() -> Packer {
        Packer {
            slot_used: FixedBitSet::with_capacity(4096),
            origin_used: FixedBitSet::with_capacity(4096),
            frontier: 0,
            max_offset: 0,
        }
    }

    /// Finds the lowest candidate base at or above the scan floor where
    /// the origin is unclaimed and every transition slot is free, then
    /// claims them.
    fn place(&mut self, transitions: &[(u8, u32)]) -> usize {
        let mut candidate = self.frontier.saturating_sub(SEARCH_OFFSET);
        while self.origin_used.contains(candidate)
            || transitions
                .iter()
                .any(|&(symbol, _)| self.slot_used.contains(candidate + symbol as usize))
        {
            candidate += 1;
        }
        grow_and_insert(&mut self.origin_used, candidate);
        for &(symbol, _) in transitions {
            let slot = candidate + symbol as usize;
            grow_and_insert(&mut self.slot_used, slot);
            if slot >= self.frontier {
                self.frontier = slot + 1;
            }
        }
        if candidate > self.max_offset {
            self.max_offset = candidate;
        }
        candidate
    }
}

fn grow_and_insert(bits: &mut FixedBitSet, bit: usize) {
    if bit >= bits.len() {
        bits.grow(bit + 1);
    }
    bits.insert(bit);
}

/// Lays out every frozen state and emits the packed automaton.
///
/// Two passes: place all states to fix their offsets, then write each
/// transition as `sym[off + s] = s`, `nxt[off + s] = off(target)`. The
/// array length leaves room for a full 256-symbol fan-out after the
/// highest base, so probing any admissible symbol stays in bounds.
pub(crate) fn pack(states: &[StateRecord], start: u32) -> Fsa {
    let mut packer = Packer::new();
    let mut offsets: Vec<i32> = vec![0; states.len()];
    for (index, record) in states.iter().enumerate() {
        if record.frozen {
            offsets[index] = packer.place(&record.transitions) as i32;
        }
    }

    let num_slots = packer.max_offset + 256;
    let mut sym = vec![EMPTY_SLOT; num_slots];
    let mut nxt = vec![0i32; num_slots];
    for (index, record) in states.iter().enumerate() {
        if !record.frozen {
            continue;
        }
        let base = offsets[index] as usize;
        for &(symbol, target) in &record.transitions {
            sym[base + symbol as usize] = symbol;
            nxt[base + symbol as usize] = offsets[target as usize];
        }
    }
    Fsa::from_parts(sym, nxt, offsets[start as usize])
}
