//! Bitstream writer.
//!
//! Bits are packed least-significant first into 32-bit little-endian words,
//! so stream bit `k` is bit `k % 8` of byte `k / 8`.

use super::abbrev::{
    Abbrev, AbbrevOp, ENCODING_ARRAY, ENCODING_BLOB, ENCODING_CHAR6, ENCODING_FIXED,
    ENCODING_VBR, encode_char6,
};
use super::{
    DEFINE_ABBREV, END_BLOCK, ENTER_SUBBLOCK, FIRST_APPLICATION_ABBREV, TOP_LEVEL_ABBREV_WIDTH,
    UNABBREV_RECORD,
};

/// Failure to encode a record against its abbreviation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("abbreviation {0} is not defined in the current block")]
    UnknownAbbrev(u32),

    #[error("abbreviation {id} does not fit the block's {width}-bit abbreviation width")]
    AbbrevIdTooWide { id: u32, width: u32 },

    #[error("record {code}: layout takes {expected} scalar fields, got {got}")]
    FieldMismatch {
        code: u32,
        expected: usize,
        got: usize,
    },

    #[error("record {code}: literal operand is {expected}, got {got}")]
    LiteralMismatch { code: u32, expected: u64, got: u64 },

    #[error("record {code}: layout ends in a blob but none was given")]
    MissingBlob { code: u32 },

    #[error("record {code}: blob given but layout has no blob operand")]
    UnexpectedBlob { code: u32 },

    #[error("record {code}: value {value} does not fit {width} bits")]
    ValueTooWide { code: u32, value: u64, width: u8 },

    #[error("record {code}: value {value} is not a char6 character")]
    NotChar6 { code: u32, value: u64 },
}

#[derive(Debug)]
struct Scope {
    outer_width: u32,
    outer_abbrevs: Vec<Abbrev>,
    /// Byte offset of the block length placeholder.
    length_at: usize,
}

#[derive(Debug)]
pub struct BitWriter {
    out: Vec<u8>,
    pending: u64,
    pending_bits: u32,
    width: u32,
    abbrevs: Vec<Abbrev>,
    scopes: Vec<Scope>,
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitWriter {
    /// Writer positioned at top level, outside any block.
    pub fn new() -> Self {
        Self::detached(TOP_LEVEL_ABBREV_WIDTH)
    }

    /// Writer whose output will later be spliced into a block that uses
    /// `abbrev_width`.
    pub fn detached(abbrev_width: u32) -> Self {
        Self {
            out: Vec::new(),
            pending: 0,
            pending_bits: 0,
            width: abbrev_width,
            abbrevs: Vec::new(),
            scopes: Vec::new(),
        }
    }

    pub fn bit_position(&self) -> u64 {
        self.out.len() as u64 * 8 + self.pending_bits as u64
    }

    pub fn abbrev_width(&self) -> u32 {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_aligned(&self) -> bool {
        self.pending_bits == 0
    }

    /// Write the low `width` bits of `value`.
    pub fn emit(&mut self, value: u64, width: u32) {
        assert!(width <= 64, "emit: width {width} exceeds 64 bits");
        if width == 0 {
            return;
        }
        if width > 32 {
            self.emit(value & 0xFFFF_FFFF, 32);
            self.emit(value >> 32, width - 32);
            return;
        }
        let masked = if width == 32 {
            value & 0xFFFF_FFFF
        } else {
            value & ((1u64 << width) - 1)
        };
        self.pending |= masked << self.pending_bits;
        self.pending_bits += width;
        if self.pending_bits >= 32 {
            self.out
                .extend_from_slice(&(self.pending as u32).to_le_bytes());
            self.pending >>= 32;
            self.pending_bits -= 32;
        }
    }

    /// Variable bit-rate: chunks of `width - 1` payload bits, high bit set
    /// when another chunk follows.
    pub fn emit_vbr(&mut self, mut value: u64, width: u32) {
        assert!((2..=32).contains(&width), "emit_vbr: width {width} out of range");
        let payload = width - 1;
        let continuation = 1u64 << payload;
        while value >= continuation {
            self.emit((value & (continuation - 1)) | continuation, width);
            value >>= payload;
        }
        self.emit(value, width);
    }

    /// Pad with zero bits to the next 32-bit boundary.
    pub fn align32(&mut self) {
        if self.pending_bits > 0 {
            self.emit(0, 32 - self.pending_bits);
        }
    }

    /// Raw bytes at top level, e.g. a file signature.
    pub fn emit_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.emit(b as u64, 8);
        }
    }

    pub fn enter_subblock(&mut self, block_id: u32, abbrev_width: u32) {
        self.emit(ENTER_SUBBLOCK as u64, self.width);
        self.emit_vbr(block_id as u64, 8);
        self.emit_vbr(abbrev_width as u64, 4);
        self.align32();
        let length_at = self.out.len();
        self.emit(0, 32);
        self.scopes.push(Scope {
            outer_width: self.width,
            outer_abbrevs: std::mem::take(&mut self.abbrevs),
            length_at,
        });
        self.width = abbrev_width;
    }

    /// Close the innermost block and patch its length in words.
    ///
    /// # Panics
    /// Panics if no block is open.
    pub fn exit_block(&mut self) {
        self.emit(END_BLOCK as u64, self.width);
        self.align32();
        let scope = self.ensure_scope();
        let words = (self.out.len() - scope.length_at - 4) / 4;
        self.out[scope.length_at..scope.length_at + 4]
            .copy_from_slice(&(words as u32).to_le_bytes());
        self.width = scope.outer_width;
        self.abbrevs = scope.outer_abbrevs;
    }

    /// Define an abbreviation in the current block and return its ID.
    pub fn emit_abbrev(&mut self, abbrev: Abbrev) -> u32 {
        self.emit(DEFINE_ABBREV as u64, self.width);
        self.emit_vbr(abbrev.ops().len() as u64, 5);
        for &op in abbrev.ops() {
            match op {
                AbbrevOp::Literal(value) => {
                    self.emit(1, 1);
                    self.emit_vbr(value, 8);
                }
                AbbrevOp::Fixed(width) => {
                    self.emit(0, 1);
                    self.emit(ENCODING_FIXED, 3);
                    self.emit_vbr(width as u64, 5);
                }
                AbbrevOp::Vbr(width) => {
                    self.emit(0, 1);
                    self.emit(ENCODING_VBR, 3);
                    self.emit_vbr(width as u64, 5);
                }
                AbbrevOp::Array => {
                    self.emit(0, 1);
                    self.emit(ENCODING_ARRAY, 3);
                }
                AbbrevOp::Char6 => {
                    self.emit(0, 1);
                    self.emit(ENCODING_CHAR6, 3);
                }
                AbbrevOp::Blob => {
                    self.emit(0, 1);
                    self.emit(ENCODING_BLOB, 3);
                }
            }
        }
        self.abbrevs.push(abbrev);
        FIRST_APPLICATION_ABBREV + self.abbrevs.len() as u32 - 1
    }

    /// Self-describing record: every operand as VBR6.
    pub fn emit_record(&mut self, code: u32, fields: &[u64]) {
        self.emit(UNABBREV_RECORD as u64, self.width);
        self.emit_vbr(code as u64, 6);
        self.emit_vbr(fields.len() as u64, 6);
        for &field in fields {
            self.emit_vbr(field, 6);
        }
    }

    /// Record encoded through a previously defined abbreviation.
    ///
    /// Scalar operands consume `fields` in order; a trailing array consumes
    /// every remaining field.
    pub fn emit_record_with_abbrev(
        &mut self,
        abbrev_id: u32,
        code: u32,
        fields: &[u64],
        blob: Option<&[u8]>,
    ) -> Result<(), EncodeError> {
        let abbrev = abbrev_id
            .checked_sub(FIRST_APPLICATION_ABBREV)
            .and_then(|index| self.abbrevs.get(index as usize))
            .cloned()
            .ok_or(EncodeError::UnknownAbbrev(abbrev_id))?;
        if abbrev_id >> self.width != 0 {
            return Err(EncodeError::AbbrevIdTooWide {
                id: abbrev_id,
                width: self.width,
            });
        }
        let ops = abbrev.ops();

        let expected = abbrev.scalar_field_count();
        let fits = if abbrev.has_array() {
            fields.len() >= expected
        } else {
            fields.len() == expected
        };
        if !fits {
            return Err(EncodeError::FieldMismatch {
                code,
                expected,
                got: fields.len(),
            });
        }
        match (abbrev.has_blob(), blob) {
            (true, None) => return Err(EncodeError::MissingBlob { code }),
            (false, Some(_)) => return Err(EncodeError::UnexpectedBlob { code }),
            _ => {}
        }

        self.emit(abbrev_id as u64, self.width);
        self.emit_operand(ops[0], code as u64, code)?;

        let mut next = 0;
        let mut i = 1;
        while i < ops.len() {
            match ops[i] {
                AbbrevOp::Array => {
                    let element = ops[i + 1];
                    let rest = &fields[next..];
                    self.emit_vbr(rest.len() as u64, 6);
                    for &value in rest {
                        self.emit_operand(element, value, code)?;
                    }
                    next = fields.len();
                    i += 2;
                }
                AbbrevOp::Blob => {
                    let bytes = blob.unwrap_or_default();
                    self.emit_blob_body(bytes);
                    i += 1;
                }
                op => {
                    self.emit_operand(op, fields[next], code)?;
                    next += 1;
                    i += 1;
                }
            }
        }
        Ok(())
    }

    fn emit_operand(&mut self, op: AbbrevOp, value: u64, code: u32) -> Result<(), EncodeError> {
        match op {
            AbbrevOp::Literal(expected) => {
                if value != expected {
                    return Err(EncodeError::LiteralMismatch {
                        code,
                        expected,
                        got: value,
                    });
                }
            }
            AbbrevOp::Fixed(width) => {
                if width < 64 && value >> width != 0 {
                    return Err(EncodeError::ValueTooWide { code, value, width });
                }
                self.emit(value, width as u32);
            }
            AbbrevOp::Vbr(width) => self.emit_vbr(value, width as u32),
            AbbrevOp::Char6 => {
                let encoded = u8::try_from(value)
                    .ok()
                    .and_then(encode_char6)
                    .ok_or(EncodeError::NotChar6 { code, value })?;
                self.emit(encoded, 6);
            }
            AbbrevOp::Array | AbbrevOp::Blob => {
                unreachable!("array and blob operands are handled by the record loop")
            }
        }
        Ok(())
    }

    fn emit_blob_body(&mut self, bytes: &[u8]) {
        self.emit_vbr(bytes.len() as u64, 6);
        self.align32();
        self.out.extend_from_slice(bytes);
        while self.out.len() % 4 != 0 {
            self.out.push(0);
        }
    }

    /// Splice the complete output of a detached writer at the current position.
    ///
    /// Returns the bit position where the spliced bytes begin, which is the
    /// base for any offsets recorded against the detached writer.
    ///
    /// # Panics
    /// Panics if either writer is mid-word or `other` has open blocks.
    pub fn append_aligned(&mut self, other: BitWriter) -> u64 {
        self.ensure_splice(&other);
        let base = self.bit_position();
        self.out.extend_from_slice(&other.out);
        base
    }

    /// Bytes written so far. The writer must be 32-bit aligned.
    pub fn bytes(&self) -> &[u8] {
        assert!(self.is_aligned(), "bytes: writer is mid-word");
        &self.out
    }

    /// Finish the stream, padding a trailing partial word with zeros.
    pub fn finish(mut self) -> Vec<u8> {
        assert!(
            self.scopes.is_empty(),
            "finish: {} block(s) still open",
            self.scopes.len()
        );
        self.align32();
        self.out
    }

    fn ensure_scope(&mut self) -> Scope {
        self.scopes
            .pop()
            .unwrap_or_else(|| panic!("exit_block: no open block"))
    }

    fn ensure_splice(&self, other: &BitWriter) {
        assert!(
            self.is_aligned() && other.is_aligned(),
            "append_aligned: both writers must be 32-bit aligned"
        );
        assert!(
            other.scopes.is_empty(),
            "append_aligned: detached writer has open blocks"
        );
    }
}
