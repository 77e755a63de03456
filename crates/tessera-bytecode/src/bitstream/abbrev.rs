//! Record abbreviations.
//!
//! An abbreviation describes the bit layout of one record shape so that each
//! instance can be written without self-describing field widths. Operand 0
//! always encodes the record code (normally as a literal). An `Array` operand
//! is followed by the operand that encodes its elements and must come last;
//! a `Blob` operand must come last as well.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AbbrevOp {
    /// Constant value, not present in the bitstream.
    Literal(u64),
    Fixed(u8),
    Vbr(u8),
    /// VBR6 element count, then elements encoded by the following operand.
    Array,
    /// Six-bit character: `[a-zA-Z0-9._]`.
    Char6,
    /// VBR6 byte length, 32-bit alignment, bytes, padding to 32 bits.
    Blob,
}

/// Encoding tags used by `DEFINE_ABBREV`.
pub(crate) const ENCODING_FIXED: u64 = 1;
pub(crate) const ENCODING_VBR: u64 = 2;
pub(crate) const ENCODING_ARRAY: u64 = 3;
pub(crate) const ENCODING_CHAR6: u64 = 4;
pub(crate) const ENCODING_BLOB: u64 = 5;

impl AbbrevOp {
    /// Whether the encoding carries a width operand in `DEFINE_ABBREV`.
    pub fn has_width(self) -> bool {
        matches!(self, AbbrevOp::Fixed(_) | AbbrevOp::Vbr(_))
    }

    /// Whether the operand reads a single scalar value.
    pub fn is_scalar(self) -> bool {
        !matches!(self, AbbrevOp::Array | AbbrevOp::Blob)
    }
}

/// A record layout: the code literal followed by field operands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Abbrev {
    ops: Vec<AbbrevOp>,
}

impl Abbrev {
    /// Layout for record `code` with scalar `fields`.
    pub fn new(code: u32, fields: &[AbbrevOp]) -> Self {
        let mut ops = Vec::with_capacity(fields.len() + 1);
        ops.push(AbbrevOp::Literal(code as u64));
        ops.extend_from_slice(fields);
        Self { ops }
    }

    /// Rebuild a layout from operands read back from a stream.
    pub fn from_ops(ops: Vec<AbbrevOp>) -> Self {
        Self { ops }
    }

    /// Append a trailing array whose elements use `element`.
    pub fn with_array(mut self, element: AbbrevOp) -> Self {
        self.ops.push(AbbrevOp::Array);
        self.ops.push(element);
        self
    }

    /// Append a trailing blob.
    pub fn with_blob(mut self) -> Self {
        self.ops.push(AbbrevOp::Blob);
        self
    }

    pub fn ops(&self) -> &[AbbrevOp] {
        &self.ops
    }

    /// Record code, if operand 0 is a literal.
    pub fn code(&self) -> Option<u32> {
        match self.ops.first() {
            Some(AbbrevOp::Literal(code)) => Some(*code as u32),
            _ => None,
        }
    }

    pub fn has_array(&self) -> bool {
        self.ops.contains(&AbbrevOp::Array)
    }

    pub fn has_blob(&self) -> bool {
        self.ops.last() == Some(&AbbrevOp::Blob)
    }

    /// Number of scalar fields after the code, excluding array elements.
    pub fn scalar_field_count(&self) -> usize {
        let mut count = 0;
        let mut ops = self.ops.iter().skip(1);
        while let Some(op) = ops.next() {
            match op {
                AbbrevOp::Array => {
                    ops.next();
                }
                AbbrevOp::Blob => {}
                _ => count += 1,
            }
        }
        count
    }
}

pub(crate) fn encode_char6(c: u8) -> Option<u64> {
    let value = match c {
        b'a'..=b'z' => c - b'a',
        b'A'..=b'Z' => c - b'A' + 26,
        b'0'..=b'9' => c - b'0' + 52,
        b'.' => 62,
        b'_' => 63,
        _ => return None,
    };
    Some(value as u64)
}

pub(crate) fn decode_char6(v: u64) -> u8 {
    match v {
        0..=25 => b'a' + v as u8,
        26..=51 => b'A' + (v - 26) as u8,
        52..=61 => b'0' + (v - 52) as u8,
        62 => b'.',
        _ => b'_',
    }
}
