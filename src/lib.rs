/*!

Build and query minimal acyclic deterministic finite-state automata
(also known as DAWGs) over byte strings.

Keys are fed to a [`Builder`] in sorted order, one at a time. The
builder keeps the automaton minimal after every insertion, so memory
stays proportional to the minimal machine rather than to a trie of the
input. Finalizing packs the states into two flat arrays (a sparse
double-array), which the immutable [`Fsa`] then answers membership and
prefix queries from, and serializes to a `.fsa` file.

The required order is unsigned lexicographic with one twist: a key
sorts *after* any of its extensions, so `"ballpark"` comes before
`"ball"`. The bytes `0x00` and `0xFF` are reserved and may not appear
in keys; valid UTF-8 never contains either, so any UTF-8 text is
admissible.

# Example

```rust
use dawg_automata::Builder;

let mut builder = Builder::new();
builder.insert_sorted("ballpark").unwrap();
builder.insert_sorted("ball").unwrap();
builder.insert_sorted("bark").unwrap();
let fsa = builder.build_fsa();

assert!(fsa.lookup("ball").unwrap());
assert!(!fsa.lookup("ballroom").unwrap());

// prefixes can be explored incrementally
let mut cursor = fsa.start();
cursor.consume("bal").unwrap();
assert!(cursor.is_valid());
assert!(!cursor.is_final());
```

The construction follows
**Incremental Construction of Minimal Acyclic Finite-State Automata (1998)**
by Jan Daciuk, Stoyan Mihov, Bruce Watson and Richard Watson.

!*/


mod builder;
mod cursor;
mod errors;
mod fsa;
mod packer;
mod register;
mod word;

pub use self::builder::Builder;
pub use self::cursor::Cursor;
pub use self::errors::{BuildError, FsaError};
pub use self::fsa::Fsa;
pub use self::word::Word;
