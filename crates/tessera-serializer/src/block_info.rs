//! `BLOCKINFO` name directory.
//!
//! Records here are unabbreviated so that a reader can decode them before
//! it knows anything about the file.

use tessera_bytecode::BitWriter;
use tessera_bytecode::format::BlockId;
use tessera_bytecode::format::records::{DECLS_SUPPORT_BASE, block_info, decls};

/// Names of every block and record code defined by the format.
pub(crate) fn write_block_info(out: &mut BitWriter) {
    let info = BlockId::BlockInfo;
    out.enter_subblock(info.as_u32(), info.abbrev_width());
    for block in BlockId::ALL {
        if block == BlockId::BlockInfo {
            continue;
        }
        out.emit_record(block_info::SETBID, &[block.as_u32() as u64]);
        out.emit_record(block_info::BLOCKNAME, &name_bytes(block.name()));

        let mut records: Vec<(u32, &str)> = block.records().to_vec();
        if block == BlockId::Body {
            records.extend(
                decls::NAMES
                    .iter()
                    .copied()
                    .filter(|&(code, _)| code >= DECLS_SUPPORT_BASE),
            );
        }
        for (code, name) in records {
            let mut fields = vec![code as u64];
            fields.extend(name_bytes(name));
            out.emit_record(block_info::SETRECORDNAME, &fields);
        }
    }
    out.exit_block();
}

fn name_bytes(name: &str) -> Vec<u64> {
    name.bytes().map(u64::from).collect()
}
