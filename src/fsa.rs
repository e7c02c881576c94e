use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::cursor::Cursor;
use crate::errors::FsaError;
use crate::word::Word;

/// Sentinel for an unclaimed slot in the `sym` array.
pub(crate) const EMPTY_SLOT: u8 = 0x00;

/// Reserved symbol marking finality: a state based at `b` is final iff
/// `sym[b + 0xFF] == 0xFF`.
pub(crate) const FINAL_SYMBOL: u8 = 0xFF;

pub(crate) fn is_reserved(byte: u8) -> bool {
    byte == EMPTY_SLOT || byte == FINAL_SYMBOL
}

const MAGIC: u32 = 0x62D8_0AB5;
const IO_BUFFER: usize = 1 << 20;

/// An immutable minimal acyclic DFA in sparse double-array form.
///
/// A state is identified by its base offset into two parallel arrays.
/// From base `b`, consuming byte `x` probes slot `b + x`: the
/// transition exists iff `sym[b + x] == x`, and then `nxt[b + x]` is
/// the target base. Symbols `0x00` and `0xFF` are reserved (empty slot
/// and finality marker), so keys never contain them; any valid UTF-8
/// text is admissible.
///
/// The automaton is immutable and safe to share across threads.
/// Queries go through [`lookup`](Fsa::lookup) for plain membership or
/// through a [`Cursor`] for incremental prefix traversal.
///
/// # Serialized form
///
/// [`write`](Fsa::write) and [`read`](Fsa::read) use a fixed
/// little-endian layout, conventionally in `.fsa` files:
///
/// ```text
/// offset  size  field
/// 0       4     magic = 0x62D80AB5
/// 4       4     number of slots L
/// 8       4     start base
/// 12      L     sym bytes
/// 12+L    4*L   nxt, signed 32-bit
/// ```
#[derive(Clone, PartialEq)]
pub struct Fsa {
    sym: Vec<u8>,
    nxt: Vec<i32>,
    start: i32,
}

impl Fsa {
    pub(crate) fn from_parts(sym: Vec<u8>, nxt: Vec<i32>, start: i32) -> Fsa {
        Fsa { sym, nxt, start }
    }

    /// Returns a cursor positioned at the start state.
    pub fn start(&self) -> Cursor<'_> {
        Cursor::new(self, self.start)
    }

    /// Length of the shared arrays.
    pub fn num_slots(&self) -> usize {
        self.sym.len()
    }

    pub(crate) fn step_base(&self, base: i32, symbol: u8) -> Option<i32> {
        let slot = base as usize + symbol as usize;
        match self.sym.get(slot) {
            Some(&claimed) if claimed == symbol => Some(self.nxt[slot]),
            _ => None,
        }
    }

    pub(crate) fn is_final_base(&self, base: i32) -> bool {
        let slot = base as usize + FINAL_SYMBOL as usize;
        self.sym.get(slot) == Some(&FINAL_SYMBOL)
    }

    /// True iff `key` is exactly one of the inserted keys.
    pub fn lookup<B: AsRef<[u8]>>(&self, key: B) -> Result<bool, FsaError> {
        let mut cursor = self.start();
        cursor.consume(key)?;
        Ok(cursor.is_valid() && cursor.is_final())
    }

    /// Enumerates every accepted key.
    ///
    /// The traversal is a depth-first walk in ascending symbol order,
    /// emitting a word at its `0xFF` slot, after any children. Since
    /// `0xFF` sorts above every admissible byte, the output follows the
    /// crate's total order: extensions first, then their prefix. The
    /// result can be re-fed to a fresh [`Builder`](crate::Builder) as is.
    pub fn dictionary(&self) -> Vec<Word> {
        let mut words = Vec::new();
        let mut current = Vec::new();
        self.enumerate(self.start, &mut current, &mut words);
        words
    }

    fn enumerate(&self, base: i32, current: &mut Vec<u8>, words: &mut Vec<Word>) {
        for symbol in 1..=254u8 {
            if let Some(target) = self.step_base(base, symbol) {
                current.push(symbol);
                self.enumerate(target, current, words);
                current.pop();
            }
        }
        if self.is_final_base(base) {
            words.push(Word::from(&current[..]));
        }
    }

    /// Writes the automaton to `path` in the serialized form above.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), FsaError> {
        let mut wtr = BufWriter::with_capacity(IO_BUFFER, File::create(path)?);
        self.write_to(&mut wtr)?;
        wtr.flush()?;
        Ok(())
    }

    pub fn write_to<W: Write>(&self, wtr: &mut W) -> Result<(), FsaError> {
        wtr.write_u32::<LittleEndian>(MAGIC)?;
        wtr.write_u32::<LittleEndian>(self.sym.len() as u32)?;
        wtr.write_i32::<LittleEndian>(self.start)?;
        wtr.write_all(&self.sym)?;
        for &target in &self.nxt {
            wtr.write_i32::<LittleEndian>(target)?;
        }
        Ok(())
    }

    /// Reads an automaton back from `path`, validating the header.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Fsa, FsaError> {
        let mut rdr = BufReader::with_capacity(IO_BUFFER, File::open(path)?);
        Fsa::read_from(&mut rdr)
    }

    pub fn read_from<R: Read>(rdr: &mut R) -> Result<Fsa, FsaError> {
        let magic = rdr.read_u32::<LittleEndian>()?;
        if magic != MAGIC {
            return Err(FsaError::InvalidFile("bad magic number"));
        }
        let num_slots = rdr.read_u32::<LittleEndian>()? as usize;
        let start = rdr.read_i32::<LittleEndian>()?;
        if start < 0 || start as usize + 256 > num_slots {
            return Err(FsaError::InvalidFile("start base out of range"));
        }
        let mut sym = vec![0u8; num_slots];
        rdr.read_exact(&mut sym)?;
        let mut nxt = vec![0i32; num_slots];
        rdr.read_i32_into::<LittleEndian>(&mut nxt)?;
        Ok(Fsa { sym, nxt, start })
    }
}

impl fmt::Debug for Fsa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fsa")
            .field("num_slots", &self.sym.len())
            .field("start", &self.start)
            .finish()
    }
}

#[cfg(feature = "fst_automaton")]
impl fst::Automaton for Fsa {
    type State = Option<i32>;

    fn start(&self) -> Option<i32> {
        Some(self.start)
    }

    fn is_match(&self, state: &Option<i32>) -> bool {
        state.map_or(false, |base| self.is_final_base(base))
    }

    fn can_match(&self, state: &Option<i32>) -> bool {
        state.is_some()
    }

    fn accept(&self, state: &Option<i32>, byte: u8) -> Option<i32> {
        match *state {
            Some(base) if !is_reserved(byte) => self.step_base(base, byte),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Fsa;
    use crate::builder::Builder;
    use crate::errors::FsaError;

    fn sample_fsa() -> Fsa {
        let mut builder = Builder::new();
        builder.insert_sorted("ballpark").unwrap();
        builder.insert_sorted("ball").unwrap();
        builder.insert_sorted("bark").unwrap();
        builder.build_fsa()
    }

    #[test]
    fn test_file_round_trip() {
        let fsa = sample_fsa();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.fsa");
        fsa.write(&path).unwrap();
        let recovered = Fsa::read(&path).unwrap();
        assert_eq!(fsa, recovered);
        assert_eq!(fsa.dictionary(), recovered.dictionary());
        assert!(recovered.lookup("ballpark").unwrap());
        assert!(!recovered.lookup("ballparks").unwrap());
    }

    #[test]
    fn test_buffer_round_trip() {
        let fsa = sample_fsa();
        let mut buffer = Vec::new();
        fsa.write_to(&mut buffer).unwrap();
        let recovered = Fsa::read_from(&mut &buffer[..]).unwrap();
        assert_eq!(fsa, recovered);
    }

    #[test]
    fn test_bad_magic_is_rejected() {
        let fsa = sample_fsa();
        let mut buffer = Vec::new();
        fsa.write_to(&mut buffer).unwrap();
        buffer[0] ^= 0x01;
        match Fsa::read_from(&mut &buffer[..]) {
            Err(FsaError::InvalidFile(reason)) => assert_eq!(reason, "bad magic number"),
            other => panic!("expected InvalidFile, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_start_is_rejected() {
        let fsa = sample_fsa();
        let mut buffer = Vec::new();
        fsa.write_to(&mut buffer).unwrap();
        // start base beyond L - 256
        buffer[8..12].copy_from_slice(&i32::MAX.to_le_bytes());
        assert!(matches!(
            Fsa::read_from(&mut &buffer[..]),
            Err(FsaError::InvalidFile(_))
        ));
    }

    #[test]
    fn test_truncated_file_is_an_io_error() {
        let fsa = sample_fsa();
        let mut buffer = Vec::new();
        fsa.write_to(&mut buffer).unwrap();
        buffer.truncate(buffer.len() / 2);
        assert!(matches!(
            Fsa::read_from(&mut &buffer[..]),
            Err(FsaError::Io(_))
        ));
    }

    #[test]
    fn test_lookup_rejects_reserved_bytes() {
        let fsa = sample_fsa();
        assert!(matches!(
            fsa.lookup([0x62, 0xFF]),
            Err(FsaError::ReservedByte(0xFF))
        ));
        assert!(matches!(
            fsa.lookup([0x00]),
            Err(FsaError::ReservedByte(0x00))
        ));
    }
}
