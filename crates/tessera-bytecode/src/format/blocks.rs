//! Block identifiers.

use super::records;

/// Every block a module or doc file can contain.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[repr(u8)]
pub enum BlockId {
    /// Standard block-info block carrying the name directory.
    BlockInfo = 0,
    Module = 8,
    Control = 9,
    Input = 10,
    DeclsAndTypes = 11,
    IdentifierData = 12,
    Index = 13,
    Body = 14,
    BodyIndex = 15,
    Options = 16,
    DeclMemberTables = 17,
    Comment = 18,
    ModuleDoc = 19,
}

impl BlockId {
    pub const ALL: [BlockId; 13] = [
        BlockId::BlockInfo,
        BlockId::Module,
        BlockId::Control,
        BlockId::Input,
        BlockId::DeclsAndTypes,
        BlockId::IdentifierData,
        BlockId::Index,
        BlockId::Body,
        BlockId::BodyIndex,
        BlockId::Options,
        BlockId::DeclMemberTables,
        BlockId::Comment,
        BlockId::ModuleDoc,
    ];

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::BlockInfo),
            8 => Some(Self::Module),
            9 => Some(Self::Control),
            10 => Some(Self::Input),
            11 => Some(Self::DeclsAndTypes),
            12 => Some(Self::IdentifierData),
            13 => Some(Self::Index),
            14 => Some(Self::Body),
            15 => Some(Self::BodyIndex),
            16 => Some(Self::Options),
            17 => Some(Self::DeclMemberTables),
            18 => Some(Self::Comment),
            19 => Some(Self::ModuleDoc),
            _ => None,
        }
    }

    pub fn from_u32(v: u32) -> Option<Self> {
        u8::try_from(v).ok().and_then(Self::from_u8)
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::BlockInfo => "BLOCKINFO",
            Self::Module => "MODULE_BLOCK",
            Self::Control => "CONTROL_BLOCK",
            Self::Input => "INPUT_BLOCK",
            Self::DeclsAndTypes => "DECLS_AND_TYPES_BLOCK",
            Self::IdentifierData => "IDENTIFIER_DATA_BLOCK",
            Self::Index => "INDEX_BLOCK",
            Self::Body => "BODY_BLOCK",
            Self::BodyIndex => "BODY_INDEX_BLOCK",
            Self::Options => "OPTIONS_BLOCK",
            Self::DeclMemberTables => "DECL_MEMBER_TABLES_BLOCK",
            Self::Comment => "COMMENT_BLOCK",
            Self::ModuleDoc => "MODULE_DOC_BLOCK",
        }
    }

    /// Abbreviation width used inside the block. Must hold the highest ID
    /// of the block's layouts.
    pub fn abbrev_width(self) -> u32 {
        match self {
            Self::BlockInfo => 2,
            Self::Index => 5,
            Self::Body => 6,
            Self::DeclsAndTypes => 7,
            _ => 4,
        }
    }

    /// Record codes and names defined for the block.
    pub fn records(self) -> &'static [(u32, &'static str)] {
        match self {
            Self::BlockInfo => records::block_info::NAMES,
            Self::Module | Self::ModuleDoc => &[],
            Self::Control => records::control::NAMES,
            Self::Input => records::input::NAMES,
            Self::DeclsAndTypes => records::decls::NAMES,
            Self::IdentifierData => records::identifier_data::NAMES,
            Self::Index => records::index::NAMES,
            Self::Body => records::body::NAMES,
            Self::BodyIndex => records::body_index::NAMES,
            Self::Options => records::options::NAMES,
            Self::DeclMemberTables => records::decl_member_tables::NAMES,
            Self::Comment => records::comment::NAMES,
        }
    }

    pub fn record_name(self, code: u32) -> Option<&'static str> {
        let names = match self {
            Self::Body if code >= records::DECLS_SUPPORT_BASE => records::decls::NAMES,
            _ => self.records(),
        };
        names
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, name)| *name)
    }
}
