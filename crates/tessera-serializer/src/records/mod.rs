//! Record encoders for the declarations-and-types block.
//!
//! Each submodule adds the `write_*` methods for one entity family to
//! [`Serializer`](crate::Serializer). Writers record the entity's offset
//! first, then emit its record and any trailing records.

mod conformances;
mod contexts;
mod decls;
mod generics;
mod types;

pub(crate) use decls::decl_record_code;
