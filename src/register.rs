use std::collections::HashMap;

/// Signature of a builder state: its ordered transition list.
///
/// Two states are equivalent iff their signatures are equal, provided
/// every target is itself registered. Registration happens bottom-up,
/// so comparing target handles positionally is the same as comparing
/// right languages.
pub(crate) type Signature = Box<[(u8, u32)]>;

/// Map from signature to the registered (frozen, canonical) state.
pub(crate) struct Register {
    states: HashMap<Signature, u32>,
}

impl Register {
    pub fn new() -> Register {
        Register {
            states: HashMap::new(),
        }
    }

    pub fn get(&self, signature: &[(u8, u32)]) -> Option<u32> {
        self.states.get(signature).copied()
    }

    pub fn insert(&mut self, signature: Signature, state: u32) {
        self.states.insert(signature, state);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }
}
