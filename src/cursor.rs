use crate::errors::FsaError;
use crate::fsa::{is_reserved, Fsa};

/// A mutable position in a compact automaton.
///
/// A cursor starts valid at the start state and consumes bytes one at a
/// time. Stepping over a missing transition invalidates it, and an
/// invalid cursor stays invalid; a failed walk never aborts, it just
/// reports `false`. Cloning is cheap and yields an independent cursor,
/// which makes it easy to branch the exploration of a common prefix.
///
/// Feeding one of the reserved bytes `0x00` or `0xFF` is a contract
/// breach and reported as [`FsaError::ReservedByte`] without touching
/// the cursor.
#[derive(Clone)]
pub struct Cursor<'a> {
    fsa: &'a Fsa,
    base: i32,
    valid: bool,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(fsa: &'a Fsa, base: i32) -> Cursor<'a> {
        Cursor {
            fsa,
            base,
            valid: true,
        }
    }

    /// Consumes a single byte. Returns whether the cursor is still
    /// valid afterwards.
    pub fn step_byte(&mut self, byte: u8) -> Result<bool, FsaError> {
        if is_reserved(byte) {
            return Err(FsaError::ReservedByte(byte));
        }
        if self.valid {
            match self.fsa.step_base(self.base, byte) {
                Some(target) => self.base = target,
                None => self.valid = false,
            }
        }
        Ok(self.valid)
    }

    /// Consumes a byte sequence, stopping at the first invalidation.
    /// Bytes after that point are not examined.
    pub fn consume<B: AsRef<[u8]>>(&mut self, bytes: B) -> Result<bool, FsaError> {
        for &byte in bytes.as_ref() {
            if !self.valid {
                break;
            }
            self.step_byte(byte)?;
        }
        Ok(self.valid)
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// True iff the cursor is valid and the bytes consumed so far form
    /// an inserted key.
    pub fn is_final(&self) -> bool {
        self.valid && self.fsa.is_final_base(self.base)
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::Builder;
    use crate::errors::FsaError;
    use crate::fsa::Fsa;

    fn sample_fsa() -> Fsa {
        let mut builder = Builder::new();
        builder.insert_sorted("ballpark").unwrap();
        builder.insert_sorted("ball").unwrap();
        builder.insert_sorted("bark").unwrap();
        builder.build_fsa()
    }

    #[test]
    fn test_prefixes_stay_valid() {
        let fsa = sample_fsa();
        for prefix in &["", "b", "ba", "bal", "ball", "ballp", "ballpar", "bar"] {
            let mut cursor = fsa.start();
            assert!(cursor.consume(prefix).unwrap(), "prefix {:?}", prefix);
        }
    }

    #[test]
    fn test_invalid_is_sticky() {
        let fsa = sample_fsa();
        let mut cursor = fsa.start();
        assert!(!cursor.consume("bax").unwrap());
        assert!(!cursor.is_valid());
        assert!(!cursor.is_final());
        // consuming more does not resurrect the cursor
        assert!(!cursor.step_byte(b'l').unwrap());
        assert!(!cursor.consume("lpark").unwrap());
        assert!(!cursor.is_valid());
    }

    #[test]
    fn test_clone_is_independent() {
        let fsa = sample_fsa();
        let mut shared = fsa.start();
        shared.consume("ba").unwrap();

        let mut left = shared.clone();
        let mut right = shared.clone();
        assert!(left.consume("ll").unwrap());
        assert!(right.consume("rk").unwrap());
        assert!(left.is_final());
        assert!(right.is_final());

        // the original is still parked at "ba"
        assert!(shared.is_valid());
        assert!(!shared.is_final());
        assert!(shared.consume("rk").unwrap());
    }

    #[test]
    fn test_reserved_bytes_leave_cursor_intact() {
        let fsa = sample_fsa();
        let mut cursor = fsa.start();
        cursor.consume("bal").unwrap();
        assert!(matches!(
            cursor.step_byte(0x00),
            Err(FsaError::ReservedByte(0x00))
        ));
        assert!(matches!(
            cursor.consume([0xFF]),
            Err(FsaError::ReservedByte(0xFF))
        ));
        // the failed steps did not move or invalidate the cursor
        assert!(cursor.is_valid());
        assert!(cursor.consume("l").unwrap());
        assert!(cursor.is_final());
    }

    #[test]
    fn test_finality_along_a_walk() {
        let fsa = sample_fsa();
        let mut cursor = fsa.start();
        let bytes = b"ballpark";
        for (pos, &byte) in bytes.iter().enumerate() {
            assert!(cursor.step_byte(byte).unwrap());
            let expected = pos == 3 || pos == 7; // "ball" and "ballpark"
            assert_eq!(cursor.is_final(), expected, "after byte {}", pos);
        }
    }
}
