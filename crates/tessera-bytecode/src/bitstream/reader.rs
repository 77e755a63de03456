//! Generic bitstream reader.
//!
//! Walks blocks and records without knowing what they mean. Entity graphs
//! are never rebuilt here; the cursor is for the dump tool and tests.

use super::abbrev::{
    Abbrev, AbbrevOp, ENCODING_ARRAY, ENCODING_BLOB, ENCODING_CHAR6, ENCODING_FIXED,
    ENCODING_VBR, decode_char6,
};
use super::{
    DEFINE_ABBREV, END_BLOCK, ENTER_SUBBLOCK, FIRST_APPLICATION_ABBREV, TOP_LEVEL_ABBREV_WIDTH,
    UNABBREV_RECORD,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    #[error("unexpected end of stream at bit {bit}")]
    UnexpectedEof { bit: u64 },

    #[error("bad signature: expected {expected:02X?}, found {found:02X?}")]
    BadSignature { expected: [u8; 4], found: Vec<u8> },

    #[error("abbreviation {id} is not defined (bit {bit})")]
    UnknownAbbrev { id: u32, bit: u64 },

    #[error("END_BLOCK outside any block (bit {bit})")]
    UnbalancedEnd { bit: u64 },

    #[error("variable-width value overflows 64 bits (bit {bit})")]
    VbrOverflow { bit: u64 },

    #[error("invalid abbreviation operand encoding {encoding} (bit {bit})")]
    InvalidAbbrevOp { encoding: u64, bit: u64 },

    #[error("block is not closed before end of stream")]
    UnterminatedBlock,
}

/// Random-access bit reader over a byte slice.
#[derive(Clone, Debug)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    pos: u64,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn seek(&mut self, bit: u64) {
        self.pos = bit;
    }

    pub fn len_bits(&self) -> u64 {
        self.bytes.len() as u64 * 8
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.len_bits()
    }

    pub fn read(&mut self, width: u32) -> Result<u64, ReadError> {
        assert!(width <= 64, "read: width {width} exceeds 64 bits");
        if self.pos + width as u64 > self.len_bits() {
            return Err(ReadError::UnexpectedEof { bit: self.pos });
        }
        let mut value = 0u64;
        for i in 0..width as u64 {
            let bit = self.pos + i;
            let byte = self.bytes[(bit / 8) as usize];
            value |= (((byte >> (bit % 8)) & 1) as u64) << i;
        }
        self.pos += width as u64;
        Ok(value)
    }

    pub fn read_vbr(&mut self, width: u32) -> Result<u64, ReadError> {
        let start = self.pos;
        let payload = width - 1;
        let continuation = 1u64 << payload;
        let mut value = 0u64;
        let mut shift = 0u32;
        loop {
            let chunk = self.read(width)?;
            if shift >= 64 {
                return Err(ReadError::VbrOverflow { bit: start });
            }
            value |= (chunk & (continuation - 1)) << shift;
            if chunk & continuation == 0 {
                return Ok(value);
            }
            shift += payload;
        }
    }

    pub fn align32(&mut self) {
        self.pos = (self.pos + 31) & !31;
    }

    /// Read `len` whole bytes. The position must be byte aligned.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        debug_assert!(self.pos % 8 == 0, "read_bytes: unaligned position");
        let start = (self.pos / 8) as usize;
        let end = start + len;
        if end > self.bytes.len() {
            return Err(ReadError::UnexpectedEof { bit: self.pos });
        }
        self.pos = end as u64 * 8;
        Ok(&self.bytes[start..end])
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record<'a> {
    /// Abbreviation ID, `None` for unabbreviated records.
    pub abbrev: Option<u32>,
    pub code: u32,
    pub fields: Vec<u64>,
    pub blob: Option<&'a [u8]>,
    /// Bit position of the abbreviation ID that starts the record.
    pub start_bit: u64,
}

impl Record<'_> {
    pub fn field(&self, index: usize) -> u64 {
        self.fields.get(index).copied().unwrap_or(0)
    }

    /// Blob as text, if it is valid UTF-8.
    pub fn blob_str(&self) -> Option<&str> {
        self.blob.and_then(|b| std::str::from_utf8(b).ok())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry<'a> {
    SubBlock {
        block_id: u32,
        abbrev_width: u32,
        length_words: u32,
        /// Bit position of the `ENTER_SUBBLOCK` abbreviation ID.
        start_bit: u64,
    },
    EndBlock,
    Record(Record<'a>),
}

#[derive(Debug)]
struct CursorScope {
    outer_width: u32,
    outer_abbrevs: Vec<Abbrev>,
    /// First bit after the length word.
    body_start: u64,
    length_words: u32,
}

/// Sequential walker over blocks and records.
#[derive(Debug)]
pub struct BlockCursor<'a> {
    reader: BitReader<'a>,
    width: u32,
    abbrevs: Vec<Abbrev>,
    scopes: Vec<CursorScope>,
}

impl<'a> BlockCursor<'a> {
    /// Cursor over a stream with no signature.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            reader: BitReader::new(bytes),
            width: TOP_LEVEL_ABBREV_WIDTH,
            abbrevs: Vec::new(),
            scopes: Vec::new(),
        }
    }

    /// Cursor positioned after a verified 4-byte signature.
    pub fn after_signature(bytes: &'a [u8], expected: [u8; 4]) -> Result<Self, ReadError> {
        if bytes.len() < 4 || bytes[..4] != expected {
            return Err(ReadError::BadSignature {
                expected,
                found: bytes.iter().take(4).copied().collect(),
            });
        }
        let mut cursor = Self::new(bytes);
        cursor.reader.seek(32);
        Ok(cursor)
    }

    pub fn position(&self) -> u64 {
        self.reader.position()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Next block boundary or record. `DEFINE_ABBREV` entries are consumed
    /// internally. Returns `None` at the end of the top level.
    pub fn next_entry(&mut self) -> Result<Option<Entry<'a>>, ReadError> {
        loop {
            if self.at_top_level_end() {
                if !self.scopes.is_empty() {
                    return Err(ReadError::UnterminatedBlock);
                }
                return Ok(None);
            }

            let start_bit = self.reader.position();
            let id = self.reader.read(self.width)? as u32;
            match id {
                END_BLOCK => {
                    let scope = self
                        .scopes
                        .pop()
                        .ok_or(ReadError::UnbalancedEnd { bit: start_bit })?;
                    self.reader.align32();
                    self.width = scope.outer_width;
                    self.abbrevs = scope.outer_abbrevs;
                    return Ok(Some(Entry::EndBlock));
                }
                ENTER_SUBBLOCK => {
                    let block_id = self.reader.read_vbr(8)? as u32;
                    let abbrev_width = self.reader.read_vbr(4)? as u32;
                    self.reader.align32();
                    let length_words = self.reader.read(32)? as u32;
                    self.scopes.push(CursorScope {
                        outer_width: self.width,
                        outer_abbrevs: std::mem::take(&mut self.abbrevs),
                        body_start: self.reader.position(),
                        length_words,
                    });
                    self.width = abbrev_width;
                    return Ok(Some(Entry::SubBlock {
                        block_id,
                        abbrev_width,
                        length_words,
                        start_bit,
                    }));
                }
                DEFINE_ABBREV => {
                    let abbrev = self.read_abbrev_definition()?;
                    self.abbrevs.push(abbrev);
                }
                UNABBREV_RECORD => {
                    let code = self.reader.read_vbr(6)? as u32;
                    let count = self.reader.read_vbr(6)?;
                    let mut fields = Vec::with_capacity(count.min(1024) as usize);
                    for _ in 0..count {
                        fields.push(self.reader.read_vbr(6)?);
                    }
                    return Ok(Some(Entry::Record(Record {
                        abbrev: None,
                        code,
                        fields,
                        blob: None,
                        start_bit,
                    })));
                }
                id => {
                    let abbrev = (id - FIRST_APPLICATION_ABBREV) as usize;
                    let abbrev = self
                        .abbrevs
                        .get(abbrev)
                        .cloned()
                        .ok_or(ReadError::UnknownAbbrev { id, bit: start_bit })?;
                    let record = self.read_abbreviated(id, &abbrev, start_bit)?;
                    return Ok(Some(Entry::Record(record)));
                }
            }
        }
    }

    /// Skip the rest of the block just entered, including its `END_BLOCK`.
    ///
    /// # Panics
    /// Panics if no block is open.
    pub fn skip_block(&mut self) {
        let scope = self
            .scopes
            .pop()
            .unwrap_or_else(|| panic!("skip_block: no open block"));
        self.reader
            .seek(scope.body_start + scope.length_words as u64 * 32);
        self.width = scope.outer_width;
        self.abbrevs = scope.outer_abbrevs;
    }

    /// Every record of the current block, skipping nested blocks.
    pub fn read_block_records(&mut self) -> Result<Vec<Record<'a>>, ReadError> {
        let mut records = Vec::new();
        loop {
            match self.next_entry()? {
                Some(Entry::Record(record)) => records.push(record),
                Some(Entry::SubBlock { .. }) => self.skip_block(),
                Some(Entry::EndBlock) | None => return Ok(records),
            }
        }
    }

    fn at_top_level_end(&self) -> bool {
        // Top-level padding after the last block is at most one word of zeros.
        let remaining = self.reader.len_bits().saturating_sub(self.reader.position());
        remaining < self.width as u64
    }

    fn read_abbrev_definition(&mut self) -> Result<Abbrev, ReadError> {
        let count = self.reader.read_vbr(5)?;
        let mut ops = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let bit = self.reader.position();
            let is_literal = self.reader.read(1)? == 1;
            if is_literal {
                ops.push(AbbrevOp::Literal(self.reader.read_vbr(8)?));
                continue;
            }
            let encoding = self.reader.read(3)?;
            let op = match encoding {
                ENCODING_FIXED => AbbrevOp::Fixed(self.reader.read_vbr(5)? as u8),
                ENCODING_VBR => AbbrevOp::Vbr(self.reader.read_vbr(5)? as u8),
                ENCODING_ARRAY => AbbrevOp::Array,
                ENCODING_CHAR6 => AbbrevOp::Char6,
                ENCODING_BLOB => AbbrevOp::Blob,
                encoding => return Err(ReadError::InvalidAbbrevOp { encoding, bit }),
            };
            ops.push(op);
        }
        Ok(Abbrev::from_ops(ops))
    }

    fn read_operand(&mut self, op: AbbrevOp) -> Result<u64, ReadError> {
        match op {
            AbbrevOp::Literal(value) => Ok(value),
            AbbrevOp::Fixed(width) => self.reader.read(width as u32),
            AbbrevOp::Vbr(width) => self.reader.read_vbr(width as u32),
            AbbrevOp::Char6 => Ok(decode_char6(self.reader.read(6)?) as u64),
            AbbrevOp::Array | AbbrevOp::Blob => Err(ReadError::InvalidAbbrevOp {
                encoding: if op == AbbrevOp::Array {
                    ENCODING_ARRAY
                } else {
                    ENCODING_BLOB
                },
                bit: self.reader.position(),
            }),
        }
    }

    fn read_abbreviated(
        &mut self,
        id: u32,
        abbrev: &Abbrev,
        start_bit: u64,
    ) -> Result<Record<'a>, ReadError> {
        let ops = abbrev.ops();
        let Some(&first) = ops.first() else {
            return Err(ReadError::UnknownAbbrev { id, bit: start_bit });
        };
        let code = self.read_operand(first)? as u32;
        let mut fields = Vec::new();
        let mut blob = None;

        let mut i = 1;
        while i < ops.len() {
            match ops[i] {
                AbbrevOp::Array => {
                    let element = ops.get(i + 1).copied().ok_or(ReadError::InvalidAbbrevOp {
                        encoding: ENCODING_ARRAY,
                        bit: start_bit,
                    })?;
                    let count = self.reader.read_vbr(6)?;
                    for _ in 0..count {
                        fields.push(self.read_operand(element)?);
                    }
                    i += 2;
                }
                AbbrevOp::Blob => {
                    let len = self.reader.read_vbr(6)? as usize;
                    self.reader.align32();
                    blob = Some(self.reader.read_bytes(len)?);
                    self.reader.align32();
                    i += 1;
                }
                op => {
                    fields.push(self.read_operand(op)?);
                    i += 1;
                }
            }
        }

        Ok(Record {
            abbrev: Some(id),
            code,
            fields,
            blob,
            start_bit,
        })
    }
}
