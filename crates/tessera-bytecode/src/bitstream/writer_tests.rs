use super::{Abbrev, AbbrevOp, BitWriter, EncodeError};

#[test]
fn emit_packs_lsb_first() {
    let mut w = BitWriter::new();
    w.emit(0b101, 3);

    assert_eq!(w.bit_position(), 3);
    assert_eq!(w.finish(), vec![0x05, 0, 0, 0]);
}

#[test]
fn emit_straddles_words() {
    let mut w = BitWriter::new();
    w.emit(1, 1);
    w.emit(0xFFFF_FFFF, 32);

    assert_eq!(w.finish(), vec![0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0, 0, 0]);
}

#[test]
fn emit_wide_value() {
    let mut w = BitWriter::new();
    w.emit(0x0123_4567_89AB_CDEF, 64);

    assert_eq!(
        w.finish(),
        vec![0xEF, 0xCD, 0xAB, 0x89, 0x67, 0x45, 0x23, 0x01]
    );
}

#[test]
fn vbr_splits_into_chunks() {
    let mut w = BitWriter::new();
    w.emit_vbr(5, 3);

    assert_eq!(w.bit_position(), 6);
    assert_eq!(w.finish(), vec![0x0D, 0, 0, 0]);
}

#[test]
fn vbr_small_value_is_one_chunk() {
    let mut w = BitWriter::new();
    w.emit_vbr(31, 6);

    assert_eq!(w.bit_position(), 6);
}

#[test]
fn block_length_is_patched() {
    let mut w = BitWriter::new();
    w.enter_subblock(8, 3);
    assert_eq!(w.depth(), 1);
    w.emit_record(1, &[2]);
    w.exit_block();
    assert_eq!(w.depth(), 0);
    assert_eq!(w.abbrev_width(), 2);

    assert_eq!(
        w.finish(),
        vec![
            0x21, 0x0C, 0x00, 0x00, // ENTER_SUBBLOCK, id 8, width 3
            0x01, 0x00, 0x00, 0x00, // one word follows
            0x0B, 0x02, 0x01, 0x00, // record 1 [2], END_BLOCK
        ]
    );
}

#[test]
fn abbrev_ids_start_at_four_and_reset_per_block() {
    let mut w = BitWriter::new();
    w.enter_subblock(8, 4);
    let a = w.emit_abbrev(Abbrev::new(1, &[AbbrevOp::Vbr(6)]));
    let b = w.emit_abbrev(Abbrev::new(2, &[AbbrevOp::Fixed(1)]));
    w.enter_subblock(9, 4);
    let c = w.emit_abbrev(Abbrev::new(3, &[]));
    w.exit_block();
    let d = w.emit_abbrev(Abbrev::new(4, &[]));
    w.exit_block();

    assert_eq!((a, b, c, d), (4, 5, 4, 6));
}

#[test]
fn abbreviated_record_checks_field_count() {
    let mut w = BitWriter::new();
    w.enter_subblock(8, 4);
    let id = w.emit_abbrev(Abbrev::new(1, &[AbbrevOp::Vbr(6), AbbrevOp::Fixed(1)]));

    let err = w.emit_record_with_abbrev(id, 1, &[3], None).unwrap_err();

    assert_eq!(
        err,
        EncodeError::FieldMismatch {
            code: 1,
            expected: 2,
            got: 1
        }
    );
}

#[test]
fn abbreviated_record_array_takes_rest() {
    let mut w = BitWriter::new();
    w.enter_subblock(8, 4);
    let id = w.emit_abbrev(Abbrev::new(1, &[AbbrevOp::Vbr(6)]).with_array(AbbrevOp::Vbr(6)));

    assert!(w.emit_record_with_abbrev(id, 1, &[7], None).is_ok());
    assert!(w.emit_record_with_abbrev(id, 1, &[7, 1, 2, 3], None).is_ok());
    assert!(matches!(
        w.emit_record_with_abbrev(id, 1, &[], None),
        Err(EncodeError::FieldMismatch { .. })
    ));
}

#[test]
fn fixed_field_rejects_wide_values() {
    let mut w = BitWriter::new();
    w.enter_subblock(8, 4);
    let id = w.emit_abbrev(Abbrev::new(1, &[AbbrevOp::Fixed(2)]));

    let err = w.emit_record_with_abbrev(id, 1, &[4], None).unwrap_err();

    assert_eq!(
        err,
        EncodeError::ValueTooWide {
            code: 1,
            value: 4,
            width: 2
        }
    );
}

#[test]
fn literal_code_must_match() {
    let mut w = BitWriter::new();
    w.enter_subblock(8, 4);
    let id = w.emit_abbrev(Abbrev::new(1, &[]));

    let err = w.emit_record_with_abbrev(id, 2, &[], None).unwrap_err();

    assert_eq!(
        err,
        EncodeError::LiteralMismatch {
            code: 2,
            expected: 1,
            got: 2
        }
    );
}

#[test]
fn blob_presence_must_match_layout() {
    let mut w = BitWriter::new();
    w.enter_subblock(8, 4);
    let with_blob = w.emit_abbrev(Abbrev::new(1, &[]).with_blob());
    let without = w.emit_abbrev(Abbrev::new(2, &[]));

    assert_eq!(
        w.emit_record_with_abbrev(with_blob, 1, &[], None),
        Err(EncodeError::MissingBlob { code: 1 })
    );
    assert_eq!(
        w.emit_record_with_abbrev(without, 2, &[], Some(b"x")),
        Err(EncodeError::UnexpectedBlob { code: 2 })
    );
}

#[test]
fn unknown_abbrev_is_rejected() {
    let mut w = BitWriter::new();
    w.enter_subblock(8, 4);

    assert_eq!(
        w.emit_record_with_abbrev(4, 1, &[], None),
        Err(EncodeError::UnknownAbbrev(4))
    );
    assert_eq!(
        w.emit_record_with_abbrev(3, 1, &[], None),
        Err(EncodeError::UnknownAbbrev(3))
    );
}

#[test]
fn abbrev_id_wider_than_block_width_is_rejected() {
    let mut w = BitWriter::new();
    w.enter_subblock(8, 3);
    let ids: Vec<u32> = (0..5)
        .map(|code| w.emit_abbrev(Abbrev::new(code, &[])))
        .collect();

    assert!(w.emit_record_with_abbrev(ids[3], 3, &[], None).is_ok());
    assert_eq!(
        w.emit_record_with_abbrev(ids[4], 4, &[], None),
        Err(EncodeError::AbbrevIdTooWide { id: 8, width: 3 })
    );
}

#[test]
fn char6_rejects_other_bytes() {
    let mut w = BitWriter::new();
    w.enter_subblock(8, 4);
    let id = w.emit_abbrev(Abbrev::new(1, &[]).with_array(AbbrevOp::Char6));

    assert!(w.emit_record_with_abbrev(id, 1, &[b'a' as u64, b'_' as u64], None).is_ok());
    assert_eq!(
        w.emit_record_with_abbrev(id, 1, &[b'-' as u64], None),
        Err(EncodeError::NotChar6 {
            code: 1,
            value: b'-' as u64
        })
    );
}

#[test]
#[should_panic(expected = "no open block")]
fn exit_without_enter_panics() {
    let mut w = BitWriter::new();
    w.exit_block();
}

#[test]
#[should_panic(expected = "still open")]
fn finish_with_open_block_panics() {
    let mut w = BitWriter::new();
    w.enter_subblock(8, 3);
    w.finish();
}

#[test]
fn append_aligned_reports_base() {
    let mut outer = BitWriter::new();
    outer.enter_subblock(8, 3);
    let before = outer.bit_position();

    let mut inner = BitWriter::detached(3);
    inner.enter_subblock(9, 3);
    inner.exit_block();
    let inner_len = inner.bit_position();

    let base = outer.append_aligned(inner);

    assert_eq!(base, before);
    assert_eq!(outer.bit_position(), before + inner_len);
}
