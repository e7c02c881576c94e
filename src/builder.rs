use std::cmp::Ordering;

use crate::errors::BuildError;
use crate::fsa::{is_reserved, Fsa, FINAL_SYMBOL};
use crate::packer;
use crate::register::Register;
use crate::word::{self, Word};

const START: u32 = 0;

/// A state under construction.
///
/// The handle of a record is its index in the builder's arena.
/// Transitions are appended in symbol-ascending order; when a record is
/// final its `0xFF` transition to the shared sink is the last entry.
/// Once `frozen` is set the record is canonical and never mutated again.
#[derive(Default)]
pub(crate) struct StateRecord {
    pub(crate) transitions: Vec<(u8, u32)>,
    pub(crate) frozen: bool,
}

impl StateRecord {
    fn has_children(&self) -> bool {
        // 0xFF points at the sink, not at a child
        matches!(self.transitions.first(), Some(&(symbol, _)) if symbol != FINAL_SYMBOL)
    }

    fn last_child(&self) -> Option<(usize, u32)> {
        self.transitions
            .iter()
            .enumerate()
            .rev()
            .find(|&(_, &(symbol, _))| symbol != FINAL_SYMBOL)
            .map(|(slot, &(_, target))| (slot, target))
    }
}

/// Incremental builder for a minimal acyclic DFA over sorted byte keys.
///
/// Keys must be fed in the crate's total order (see [`Word`]):
/// lexicographic over unsigned bytes, except that a key sorts *after*
/// any of its extensions. After every accepted key the automaton
/// restricted to frozen states is the minimal DFA for the keys seen so
/// far; the only unfrozen states are the ones on the last key's path.
///
/// Finality is not a state flag. A final state carries a transition on
/// the reserved symbol `0xFF` to a single shared sink, which makes the
/// signature of a state capture finality and lets the register treat
/// final and non-final states uniformly.
pub struct Builder {
    states: Vec<StateRecord>,
    register: Register,
    sink: Option<u32>,
    previous: Option<Vec<u8>>,
    finalized: bool,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            states: vec![StateRecord::default()],
            register: Register::new(),
            sink: None,
            previous: None,
            finalized: false,
        }
    }

    /// Inserts the next key.
    ///
    /// The key must sort at or after the previously inserted one;
    /// inserting the previous key again is a no-op. No mutation happens
    /// before all checks pass, so the builder survives any error.
    pub fn insert_sorted<B: AsRef<[u8]>>(&mut self, input: B) -> Result<(), BuildError> {
        let input = input.as_ref();
        if let Some(&reserved) = input.iter().find(|&&byte| is_reserved(byte)) {
            return Err(BuildError::ReservedByte(reserved));
        }
        if let Some(previous) = &self.previous {
            match word::compare(input, previous) {
                Ordering::Less => {
                    return Err(BuildError::OrderViolation {
                        previous: Word::from(&previous[..]),
                        input: Word::from(input),
                    });
                }
                Ordering::Equal => return Ok(()),
                Ordering::Greater => {}
            }
        }
        if self.finalized {
            return Err(BuildError::Finalized);
        }

        let (prefix_len, last_state) = self.walk_prefix(input);
        if self.states[last_state as usize].has_children() {
            self.replace_or_register(last_state);
        }
        self.add_suffix(last_state, &input[prefix_len..]);
        self.previous = Some(input.to_vec());
        Ok(())
    }

    /// Freezes the remaining path and registers the start state.
    /// Idempotent; no keys are accepted afterwards.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        self.replace_or_register(START);
        let signature = self.states[START as usize].transitions.clone();
        self.states[START as usize].frozen = true;
        self.register.insert(signature.into_boxed_slice(), START);
        self.finalized = true;
    }

    /// Finalizes (if needed) and packs the frozen states into a compact
    /// double-array automaton. The builder can be dropped afterwards.
    pub fn build_fsa(&mut self) -> Fsa {
        self.finalize();
        packer::pack(&self.states, START)
    }

    /// Number of distinct registered signatures so far. After
    /// [`finalize`](Builder::finalize) this is the state count of the
    /// minimal automaton, not counting the shared sink.
    pub fn num_registered_states(&self) -> usize {
        self.register.len()
    }

    /// Longest walk from the start state labeled by a prefix of `input`.
    ///
    /// Sorted input keeps this walk on the previous key's path, so it
    /// never enters a frozen state.
    fn walk_prefix(&self, input: &[u8]) -> (usize, u32) {
        let mut state = START;
        for (pos, &byte) in input.iter().enumerate() {
            match self.transition(state, byte) {
                Some(target) => state = target,
                None => return (pos, state),
            }
        }
        (input.len(), state)
    }

    fn transition(&self, state: u32, symbol: u8) -> Option<u32> {
        self.states[state as usize]
            .transitions
            .iter()
            .find(|&&(existing, _)| existing == symbol)
            .map(|&(_, target)| target)
    }

    /// Canonicalizes the last-child chain below `state`, bottom-up.
    ///
    /// Each child on the chain either unifies with an equivalent
    /// registered state (the parent edge is rewired and the duplicate
    /// becomes garbage in the arena) or is itself registered. A frozen
    /// child is already canonical and stops the walk.
    fn replace_or_register(&mut self, state: u32) {
        let (slot, child) = match self.states[state as usize].last_child() {
            Some(found) => found,
            None => return,
        };
        if self.states[child as usize].frozen {
            return;
        }
        if self.states[child as usize].has_children() {
            self.replace_or_register(child);
        }
        match self.register.get(&self.states[child as usize].transitions) {
            Some(canonical) => {
                self.states[state as usize].transitions[slot].1 = canonical;
            }
            None => {
                let signature = self.states[child as usize].transitions.clone();
                self.states[child as usize].frozen = true;
                self.register.insert(signature.into_boxed_slice(), child);
            }
        }
    }

    /// Appends a fresh chain of states spelling `suffix` below `state`
    /// and marks the end final by linking it to the shared sink.
    fn add_suffix(&mut self, state: u32, suffix: &[u8]) {
        let mut current = state;
        for &byte in suffix {
            let fresh = self.allocate();
            self.states[current as usize].transitions.push((byte, fresh));
            current = fresh;
        }
        let sink = self.sink();
        self.states[current as usize]
            .transitions
            .push((FINAL_SYMBOL, sink));
    }

    fn allocate(&mut self) -> u32 {
        let fresh = self.states.len() as u32;
        self.states.push(StateRecord::default());
        fresh
    }

    fn sink(&mut self) -> u32 {
        match self.sink {
            Some(sink) => sink,
            None => {
                let sink = self.allocate();
                // the sink has no outgoing transitions and is canonical
                // from birth; it stays out of the register since nothing
                // ever probes the empty signature
                self.states[sink as usize].frozen = true;
                self.sink = Some(sink);
                sink
            }
        }
    }
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}
