//! Wire enumerations.
//!
//! These values are part of the file format. Variants are never reordered
//! or removed; new variants take the next free value.

macro_rules! wire_enum {
    ($($(#[$meta:meta])* $name:ident : $bits:literal { $($variant:ident = $value:literal,)* })*) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
            #[repr(u8)]
            pub enum $name {
                $($variant = $value,)*
            }

            impl $name {
                /// Field width in bits inside abbreviated records.
                pub const BITS: u8 = $bits;

                pub fn from_u8(v: u8) -> Option<Self> {
                    match v {
                        $($value => Some(Self::$variant),)*
                        _ => None,
                    }
                }

                pub fn as_u64(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

wire_enum! {
    AccessLevel: 3 {
        Private = 0,
        FilePrivate = 1,
        Internal = 2,
        Public = 3,
        Open = 4,
    }

    Associativity: 2 {
        None = 0,
        Left = 1,
        Right = 2,
    }

    StaticSpelling: 2 {
        None = 0,
        KeywordStatic = 1,
        KeywordClass = 2,
    }

    FunctionRepresentation: 2 {
        Swift = 0,
        Block = 1,
        Thin = 2,
        CFunctionPointer = 3,
    }

    /// Fixity of operators, shared by operator xref pieces.
    OperatorKind: 3 {
        Infix = 0,
        Prefix = 1,
        Postfix = 2,
        PrecedenceGroup = 3,
    }

    AccessorKind: 3 {
        Getter = 0,
        Setter = 1,
        WillSet = 2,
        DidSet = 3,
        MaterializeForSet = 4,
        Addressor = 5,
        MutableAddressor = 6,
    }

    CtorInitializerKind: 2 {
        Designated = 0,
        Convenience = 1,
        Factory = 2,
        ConvenienceFactory = 3,
    }

    MetatypeRepresentation: 2 {
        None = 0,
        Thin = 1,
        Thick = 2,
        ObjC = 3,
    }

    Ownership: 2 {
        Strong = 0,
        Weak = 1,
        Unowned = 2,
        Unmanaged = 3,
    }

    DefaultArgumentKind: 4 {
        None = 0,
        Normal = 1,
        File = 2,
        Line = 3,
        Column = 4,
        Function = 5,
        Inherited = 6,
        DsoHandle = 7,
        Nil = 8,
        EmptyArray = 9,
        EmptyDictionary = 10,
    }

    OptionalTypeKind: 2 {
        None = 0,
        Optional = 1,
        ImplicitlyUnwrapped = 2,
    }

    LibraryKind: 1 {
        Library = 0,
        Framework = 1,
    }

    StorageKind: 4 {
        Stored = 0,
        StoredWithTrivialAccessors = 1,
        StoredWithObservers = 2,
        InheritedWithObservers = 3,
        Computed = 4,
        ComputedWithMutableAddress = 5,
        Addressed = 6,
        AddressedWithTrivialAccessors = 7,
        AddressedWithObservers = 8,
    }

    GenericRequirementKind: 2 {
        Conformance = 0,
        SameType = 1,
        Superclass = 2,
        Layout = 3,
    }

    LayoutRequirementKind: 3 {
        UnknownLayout = 0,
        TrivialOfExactSize = 1,
        TrivialOfAtMostSize = 2,
        Trivial = 3,
        Class = 4,
        NativeClass = 5,
        RefCountedObject = 6,
        NativeRefCountedObject = 7,
    }

    /// Linkage of lowered functions, witness tables and globals.
    Linkage: 3 {
        Public = 0,
        Hidden = 1,
        Shared = 2,
        Private = 3,
        PublicExternal = 4,
        HiddenExternal = 5,
    }

    ResilienceStrategy: 2 {
        Default = 0,
        Resilient = 1,
        Fragile = 2,
    }
}
