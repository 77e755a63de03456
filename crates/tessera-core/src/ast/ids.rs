//! Typed arena handles.
//!
//! Every entity in an [`AstContext`](super::AstContext) is addressed by a
//! small index newtype. Handles are only meaningful for the context that
//! produced them.

use serde::{Deserialize, Serialize};

macro_rules! define_handle {
    ($($(#[$meta:meta])* $name:ident;)*) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(u32);

            impl $name {
                #[inline]
                pub fn new(index: u32) -> Self {
                    Self(index)
                }

                #[inline]
                pub fn index(self) -> usize {
                    self.0 as usize
                }

                #[inline]
                pub fn as_u32(self) -> u32 {
                    self.0
                }
            }
        )*
    };
}

define_handle! {
    /// Declaration handle.
    DeclId;
    /// Hash-consed type handle. Structurally equal types share one handle.
    TypeId;
    ModuleId;
    FileId;
    LocalContextId;
    GenericSignatureId;
    GenericEnvironmentId;
    GenericParamListId;
    ConformanceId;
    /// Captured-variable layout of a lowered box.
    BodyLayoutId;
    /// Lowered function in the auxiliary body graph.
    FunctionId;
}
