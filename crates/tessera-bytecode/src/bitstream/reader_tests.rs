use super::{Abbrev, AbbrevOp, BitReader, BitWriter, BlockCursor, Entry, ReadError, Record};

fn record(entry: Option<Entry<'_>>) -> Record<'_> {
    match entry {
        Some(Entry::Record(record)) => record,
        other => panic!("expected record, got {other:?}"),
    }
}

#[test]
fn bit_reader_reads_lsb_first() {
    let bytes = [0x0D, 0x00, 0x00, 0x00];
    let mut r = BitReader::new(&bytes);

    assert_eq!(r.read(3).unwrap(), 0b101);
    assert_eq!(r.read(3).unwrap(), 0b001);
    assert_eq!(r.position(), 6);
}

#[test]
fn bit_reader_vbr() {
    let bytes = [0x0D, 0x00, 0x00, 0x00];
    let mut r = BitReader::new(&bytes);

    assert_eq!(r.read_vbr(3).unwrap(), 5);
}

#[test]
fn bit_reader_eof() {
    let bytes = [0xFF];
    let mut r = BitReader::new(&bytes);
    r.read(6).unwrap();

    assert_eq!(r.read(3), Err(ReadError::UnexpectedEof { bit: 6 }));
}

#[test]
fn cursor_walks_blocks_and_records() {
    let mut w = BitWriter::new();
    w.enter_subblock(8, 3);
    w.emit_record(1, &[2]);
    w.exit_block();
    let bytes = w.finish();

    let mut cursor = BlockCursor::new(&bytes);

    assert_eq!(
        cursor.next_entry().unwrap(),
        Some(Entry::SubBlock {
            block_id: 8,
            abbrev_width: 3,
            length_words: 1,
            start_bit: 0,
        })
    );
    let rec = record(cursor.next_entry().unwrap());
    assert_eq!(rec.code, 1);
    assert_eq!(rec.fields, vec![2]);
    assert_eq!(rec.abbrev, None);
    assert_eq!(rec.start_bit, 64);
    assert_eq!(cursor.next_entry().unwrap(), Some(Entry::EndBlock));
    assert_eq!(cursor.next_entry().unwrap(), None);
}

#[test]
fn abbreviated_records_read_back() {
    let mut w = BitWriter::new();
    w.enter_subblock(11, 4);
    let plain = w.emit_abbrev(
        Abbrev::new(5, &[AbbrevOp::Fixed(3), AbbrevOp::Vbr(6)]).with_array(AbbrevOp::Fixed(1)),
    );
    let blob = w.emit_abbrev(Abbrev::new(7, &[AbbrevOp::Vbr(6)]).with_blob());
    let text = w.emit_abbrev(Abbrev::new(9, &[]).with_array(AbbrevOp::Char6));
    w.emit_record_with_abbrev(plain, 5, &[3, 100, 1, 0, 1], None)
        .unwrap();
    w.emit_record_with_abbrev(blob, 7, &[9], Some(b"hello"))
        .unwrap();
    let chars: Vec<u64> = b"a_Z9".iter().map(|&c| c as u64).collect();
    w.emit_record_with_abbrev(text, 9, &chars, None).unwrap();
    w.emit_record(2, &[1000]);
    w.exit_block();
    let bytes = w.finish();

    let mut cursor = BlockCursor::new(&bytes);
    cursor.next_entry().unwrap();

    let first = record(cursor.next_entry().unwrap());
    assert_eq!(first.abbrev, Some(plain));
    assert_eq!(first.code, 5);
    assert_eq!(first.fields, vec![3, 100, 1, 0, 1]);

    let second = record(cursor.next_entry().unwrap());
    assert_eq!(second.code, 7);
    assert_eq!(second.fields, vec![9]);
    assert_eq!(second.blob_str(), Some("hello"));

    let third = record(cursor.next_entry().unwrap());
    assert_eq!(third.fields, chars);

    let fourth = record(cursor.next_entry().unwrap());
    assert_eq!(fourth.code, 2);
    assert_eq!(fourth.fields, vec![1000]);

    assert_eq!(cursor.next_entry().unwrap(), Some(Entry::EndBlock));
}

#[test]
fn skip_block_jumps_past_nested_content() {
    let mut w = BitWriter::new();
    w.enter_subblock(8, 3);
    w.enter_subblock(9, 5);
    w.emit_record(1, &[1, 2, 3]);
    w.enter_subblock(10, 2);
    w.exit_block();
    w.exit_block();
    w.emit_record(4, &[]);
    w.exit_block();
    let bytes = w.finish();

    let mut cursor = BlockCursor::new(&bytes);
    cursor.next_entry().unwrap();
    assert!(matches!(
        cursor.next_entry().unwrap(),
        Some(Entry::SubBlock { block_id: 9, .. })
    ));
    cursor.skip_block();

    let rec = record(cursor.next_entry().unwrap());
    assert_eq!(rec.code, 4);
    assert_eq!(cursor.depth(), 1);
}

#[test]
fn read_block_records_skips_children() {
    let mut w = BitWriter::new();
    w.enter_subblock(8, 3);
    w.emit_record(1, &[]);
    w.enter_subblock(9, 3);
    w.emit_record(2, &[]);
    w.exit_block();
    w.emit_record(3, &[]);
    w.exit_block();
    let bytes = w.finish();

    let mut cursor = BlockCursor::new(&bytes);
    cursor.next_entry().unwrap();
    let codes: Vec<u32> = cursor
        .read_block_records()
        .unwrap()
        .iter()
        .map(|r| r.code)
        .collect();

    assert_eq!(codes, vec![1, 3]);
}

#[test]
fn spliced_block_reads_in_place() {
    let mut outer = BitWriter::new();
    outer.enter_subblock(8, 3);
    outer.enter_subblock(13, 5);
    outer.emit_record(1, &[]);
    outer.exit_block();
    let mut inner = BitWriter::detached(3);
    inner.enter_subblock(14, 6);
    inner.emit_record(7, &[42]);
    inner.exit_block();
    let base = outer.append_aligned(inner);
    outer.exit_block();
    let bytes = outer.finish();

    let mut cursor = BlockCursor::new(&bytes);
    cursor.next_entry().unwrap();
    cursor.next_entry().unwrap();
    assert_eq!(record(cursor.next_entry().unwrap()).code, 1);
    assert_eq!(cursor.next_entry().unwrap(), Some(Entry::EndBlock));
    match cursor.next_entry().unwrap() {
        Some(Entry::SubBlock {
            block_id,
            start_bit,
            ..
        }) => {
            assert_eq!(block_id, 14);
            assert_eq!(start_bit, base);
        }
        other => panic!("expected sub-block, got {other:?}"),
    }
    assert_eq!(record(cursor.next_entry().unwrap()).fields, vec![42]);
    assert_eq!(cursor.next_entry().unwrap(), Some(Entry::EndBlock));
    assert_eq!(cursor.next_entry().unwrap(), Some(Entry::EndBlock));
    assert_eq!(cursor.next_entry().unwrap(), None);
}

#[test]
fn signature_is_checked() {
    let bytes = [0xE2, 0x9C, 0xA8, 0x0E];

    assert!(BlockCursor::after_signature(&bytes, [0xE2, 0x9C, 0xA8, 0x0E]).is_ok());
    assert!(matches!(
        BlockCursor::after_signature(&bytes, [0xE2, 0x9C, 0xA8, 0x07]),
        Err(ReadError::BadSignature { .. })
    ));
}

#[test]
fn truncated_block_is_an_error() {
    let mut w = BitWriter::new();
    w.enter_subblock(8, 3);
    w.emit_record(1, &[]);
    w.exit_block();
    let bytes = w.finish();
    let truncated = &bytes[..8];

    let mut cursor = BlockCursor::new(truncated);
    cursor.next_entry().unwrap();

    assert_eq!(cursor.next_entry(), Err(ReadError::UnterminatedBlock));
}
