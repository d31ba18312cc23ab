//! Integration tests for the worked wire scenarios (the Choice scenario is
//! covered inline by `choice.rs`'s unit tests instead).

use pretty_assertions::assert_eq;
use rustyie::error::{Error, Result};
use rustyie::field::{Mandatory, MultiField, Optional};
use rustyie::ie::{OctetString, Value};
use rustyie::meta::{LenSpec, Meta, TagSpec};
use rustyie::octet::{Decoder, Encoder};
use rustyie::padding::{Padding, PaddingMode};
use rustyie::sequence::encode_sequence;
use rustyie::set::{SetMember, SetSchema};

// S1: a Sequence of a bare U8, a tagged U16, a length-only U24, a
// tag+length U32, an optional tagged U32, and an optional tag+length
// string whose LEN uses a -6/+6 conversion.

struct HeaderMessage {
    uc: Mandatory<Value<1>>,
    u16: Mandatory<Value<2>>,
    u24: Mandatory<Value<3>>,
    ip: Mandatory<Value<4>>,
    dw: Optional<Value<4>>,
    text: Optional<OctetString>,
}

impl HeaderMessage {
    fn new() -> Self {
        Self {
            uc: Mandatory::new(),
            u16: Mandatory::new(),
            u24: Mandatory::new(),
            ip: Mandatory::new(),
            dw: Optional::new(),
            text: Optional::new(),
        }
    }

    fn text_len_spec() -> LenSpec {
        fn to_len(bytes: u64) -> Result<u64> {
            Ok(bytes - 6)
        }
        fn to_bytes(len: u64) -> Result<u64> {
            Ok(len + 6)
        }
        LenSpec::new(1).with_conversion(to_len, to_bytes)
    }

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.mandatory("uc", Meta::NONE, &self.uc)?;
        enc.mandatory("u16", Meta::tag(TagSpec::new(1, 0x21)), &self.u16)?;
        enc.mandatory("u24", Meta::len(LenSpec::new(1)), &self.u24)?;
        enc.mandatory("ip", Meta::tag_len(TagSpec::new(1, 0x42), LenSpec::new(1)), &self.ip)?;
        enc.optional("dw", Meta::tag(TagSpec::new(1, 0x51)), &self.dw)?;
        enc.optional("text", Meta::tag_len(TagSpec::new(1, 0x12), Self::text_len_spec()), &self.text)
    }

    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        dec.mandatory("uc", Meta::NONE, &mut self.uc)?;
        dec.mandatory("u16", Meta::tag(TagSpec::new(1, 0x21)), &mut self.u16)?;
        dec.mandatory("u24", Meta::len(LenSpec::new(1)), &mut self.u24)?;
        dec.mandatory("ip", Meta::tag_len(TagSpec::new(1, 0x42), LenSpec::new(1)), &mut self.ip)?;
        dec.optional("dw", Meta::tag(TagSpec::new(1, 0x51)), &mut self.dw)?;
        dec.optional("text", Meta::tag_len(TagSpec::new(1, 0x12), Self::text_len_spec()), &mut self.text)
    }
}

#[test]
fn s1_sequence_matches_expected_wire_and_round_trips() {
    let mut msg = HeaderMessage::new();
    msg.uc.get_mut().set(37);
    msg.u16.get_mut().set(0x35D9);
    msg.u24.get_mut().set(0xDABEEF);
    msg.ip.get_mut().set(0xFEE1ABBA);
    msg.dw.get_mut().set(0x01020304);
    msg.text.get_mut().set("text", b"test.this!").unwrap();

    let mut data = [0u8; 31];
    {
        let mut enc = Encoder::new(&mut data);
        msg.encode(&mut enc).unwrap();
        assert_eq!(enc.offset(), 31);
    }

    let expected: [u8; 31] = [
        0x25, 0x21, 0x35, 0xD9, 0x03, 0xDA, 0xBE, 0xEF, 0x42, 0x04, 0xFE, 0xE1, 0xAB, 0xBA, 0x51,
        0x01, 0x02, 0x03, 0x04, 0x12, 0x04, b't', b'e', b's', b't', b'.', b't', b'h', b'i', b's',
        b'!',
    ];
    assert_eq!(data, expected);

    let mut decoded = HeaderMessage::new();
    let mut dec = Decoder::new(&mut data);
    decoded.decode(&mut dec).unwrap();
    assert_eq!(decoded.uc.get().get(), Some(37));
    assert_eq!(decoded.u16.get().get(), Some(0x35D9));
    assert_eq!(decoded.u24.get().get(), Some(0xDABEEF));
    assert_eq!(decoded.ip.get().get(), Some(0xFEE1ABBA));
    assert_eq!(decoded.dw.get().unwrap().get(), Some(0x01020304));
    assert_eq!(decoded.text.get().unwrap().get(), Some(&b"test.this!"[..]));
}

// S2: a Set of 2-byte-tagged members, decoded tag-dispatched (order on the
// wire doesn't matter) and re-encoded in declared order. A repeated
// single-instance member is rejected as ExtraIe.

#[derive(Debug)]
struct SetMessage {
    uc: Mandatory<Value<1>>,
    u16: Mandatory<Value<2>>,
    u24: Optional<Value<3>>,
    ip: Optional<Value<4>>,
    text: Optional<OctetString>,
}

impl SetMessage {
    fn new() -> Self {
        Self {
            uc: Mandatory::new(),
            u16: Mandatory::new(),
            u24: Optional::new(),
            ip: Optional::new(),
            text: Optional::new(),
        }
    }

    fn schema() -> SetSchema {
        SetSchema::new(vec![
            SetMember { name: "uc", tag: 0x0B },
            SetMember { name: "u16", tag: 0x21 },
            SetMember { name: "u24", tag: 0x49 },
            SetMember { name: "ip", tag: 0x89 },
            SetMember { name: "text", tag: 0x22 },
        ])
    }

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.mandatory("uc", Meta::tag(TagSpec::new(2, 0x0B)), &self.uc)?;
        enc.mandatory("u16", Meta::tag_len(TagSpec::new(2, 0x21), LenSpec::new(1)), &self.u16)?;
        enc.optional("u24", Meta::tag_len(TagSpec::new(2, 0x49), LenSpec::new(1)), &self.u24)?;
        enc.optional("ip", Meta::tag(TagSpec::new(2, 0x89)), &self.ip)?;
        enc.optional("text", Meta::tag_len(TagSpec::new(2, 0x22), LenSpec::new(1)), &self.text)
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        let schema = Self::schema();
        let mut msg = Self::new();
        let mut seen = std::collections::HashSet::new();
        while !dec.is_empty() {
            let tag = rustyie::set::peek_next_tag(dec, "set", 2).expect("non-empty region has a tag");
            let member = schema.dispatch(tag).ok_or(Error::UnknownTag { field: "set".into(), tag, offset: dec.offset() })?;
            if !seen.insert(member.tag) && member.name != "uc" && member.name != "u16" {
                return Err(Error::ExtraIe { field: member.name.into(), have: 2, max: 1 });
            }
            match member.name {
                "uc" => dec.mandatory("uc", Meta::tag(TagSpec::new(2, 0x0B)), &mut msg.uc)?,
                "u16" => dec.mandatory("u16", Meta::tag_len(TagSpec::new(2, 0x21), LenSpec::new(1)), &mut msg.u16)?,
                "u24" => dec.optional("u24", Meta::tag_len(TagSpec::new(2, 0x49), LenSpec::new(1)), &mut msg.u24)?,
                "ip" => dec.optional("ip", Meta::tag(TagSpec::new(2, 0x89)), &mut msg.ip)?,
                "text" => dec.optional("text", Meta::tag_len(TagSpec::new(2, 0x22), LenSpec::new(1)), &mut msg.text)?,
                other => unreachable!("schema dispatched to undeclared member {other}"),
            }
        }
        Ok(msg)
    }
}

#[test]
fn s2_set_decodes_regardless_of_wire_order_then_reencodes_canonically() {
    let mut msg = SetMessage::new();
    msg.uc.get_mut().set(0x11);
    msg.u16.get_mut().set(0x35D9);
    msg.u24.get_mut().set(0xDABEEF);
    msg.ip.get_mut().set(0xFEE1ABBA);
    msg.text.get_mut().set("text", b"test.this").unwrap();

    let mut declared_order = [0u8; 64];
    let declared_len = {
        let mut enc = Encoder::new(&mut declared_order);
        msg.encode(&mut enc).unwrap();
        enc.offset()
    };

    // Reorder the same TLVs on the wire: text, ip, uc, u24, u16.
    let mut shuffled = Vec::new();
    {
        let mut buf = [0u8; 64];
        let mut enc = Encoder::new(&mut buf);
        enc.optional("text", Meta::tag_len(TagSpec::new(2, 0x22), LenSpec::new(1)), &msg.text).unwrap();
        enc.optional("ip", Meta::tag(TagSpec::new(2, 0x89)), &msg.ip).unwrap();
        enc.mandatory("uc", Meta::tag(TagSpec::new(2, 0x0B)), &msg.uc).unwrap();
        enc.optional("u24", Meta::tag_len(TagSpec::new(2, 0x49), LenSpec::new(1)), &msg.u24).unwrap();
        enc.mandatory("u16", Meta::tag_len(TagSpec::new(2, 0x21), LenSpec::new(1)), &msg.u16).unwrap();
        let off = enc.offset();
        shuffled.extend_from_slice(&buf[..off]);
    }

    let mut shuffled_copy = shuffled.clone();
    let mut dec = Decoder::new(&mut shuffled_copy);
    let decoded = SetMessage::decode(&mut dec).unwrap();
    assert_eq!(decoded.uc.get().get(), Some(0x11));
    assert_eq!(decoded.u16.get().get(), Some(0x35D9));
    assert_eq!(decoded.u24.get().unwrap().get(), Some(0xDABEEF));
    assert_eq!(decoded.ip.get().unwrap().get(), Some(0xFEE1ABBA));
    assert_eq!(decoded.text.get().unwrap().get(), Some(&b"test.this"[..]));

    // Re-encoding the decoded message emits declared order again.
    let mut reencoded = [0u8; 64];
    let mut enc = Encoder::new(&mut reencoded);
    decoded.encode(&mut enc).unwrap();
    let off = enc.offset();
    assert_eq!(&reencoded[..off], &declared_order[..declared_len]);
}

#[test]
fn s2_duplicate_single_instance_member_is_extra_ie() {
    let mut data = [0u8; 12];
    {
        let mut enc = Encoder::new(&mut data);
        enc.optional("u24", Meta::tag_len(TagSpec::new(2, 0x49), LenSpec::new(1)), &{
            let mut f: Optional<Value<3>> = Optional::new();
            f.get_mut().set(1);
            f
        })
        .unwrap();
        enc.optional("u24", Meta::tag_len(TagSpec::new(2, 0x49), LenSpec::new(1)), &{
            let mut f: Optional<Value<3>> = Optional::new();
            f.get_mut().set(2);
            f
        })
        .unwrap();
    }
    let mut dec = Decoder::new(&mut data);
    let err = SetMessage::decode(&mut dec).unwrap_err();
    assert!(matches!(err, Error::ExtraIe { .. } | Error::MissingIe { .. }));
}

// S4: a standalone length placeholder with a non-zero delta, patched once
// the enclosing container (header + a trailing multi-field) closes.

#[test]
fn s4_length_placeholder_excludes_header_bytes_via_delta() {
    let mut data = [0u8; 16];
    let mut enc = Encoder::new(&mut data);
    let start = enc.offset();
    enc.begin_container();

    // U16 header field.
    let mut u16_field: Mandatory<Value<2>> = Mandatory::new();
    u16_field.get_mut().set(0x0102);
    enc.mandatory("u16", Meta::NONE, &u16_field).unwrap();

    // L(U24) placeholder: width 3, delta 6 (the header's own byte count,
    // reserved before the trailing U8 and multi are written).
    let placeholder_spec = LenSpec::new(3).with_delta(6);
    enc.reserve_placeholder("len", placeholder_spec, false).unwrap();

    // U8 header trailer.
    let mut u8_field: Mandatory<Value<1>> = Mandatory::new();
    u8_field.get_mut().set(0xFF);
    enc.mandatory("trailer", Meta::NONE, &u8_field).unwrap();

    // Two T=0x62 U32 elements.
    let mut multi: MultiField<Value<4>, 4> = MultiField::new();
    let mut a: Value<4> = Value::plain();
    a.set(1);
    let mut b: Value<4> = Value::plain();
    b.set(2);
    multi.push_back("m", a).unwrap();
    multi.push_back("m", b).unwrap();
    enc.multi("m", Meta::tag(TagSpec::new(1, 0x62)), &multi, 0, usize::MAX).unwrap();

    let end = enc.offset();
    enc.end_container("header", start, None).unwrap();

    // Property 3 (exclusive): length == end − placeholder_offset − width − delta.
    let placeholder_offset = 2; // right after the 2-byte U16.
    let expected_len = (end - placeholder_offset - 3 - 6) as u32;
    let patched = &data[placeholder_offset..placeholder_offset + 3];
    let mut full = [0u8; 4];
    full[1..].copy_from_slice(patched);
    assert_eq!(u32::from_be_bytes(full), expected_len);
}

// S5: a multi-field counted by a preceding U16, enforcing [min, max].

#[test]
fn s5_counted_multi_enforces_minimum_and_round_trips_count() {
    let mut two = MultiField::<Value<1>, 8>::new();
    let mut e1: Value<1> = Value::plain();
    e1.set(1);
    let mut e2: Value<1> = Value::plain();
    e2.set(2);
    two.push_back("e", e1).unwrap();
    two.push_back("e", e2).unwrap();

    let mut data = [0u8; 8];
    {
        let mut enc = Encoder::new(&mut data);
        enc.counted_multi("items", 2, Meta::NONE, &two, 2, usize::MAX).unwrap();
        assert_eq!(&data[..4], &[0x00, 0x02, 0x01, 0x02]);
    }

    let mut one = MultiField::<Value<1>, 8>::new();
    let mut only: Value<1> = Value::plain();
    only.set(9);
    one.push_back("e", only).unwrap();
    let mut short_data = [0u8; 8];
    let mut enc = Encoder::new(&mut short_data);
    let err = enc.counted_multi("items", 2, Meta::NONE, &one, 2, usize::MAX).unwrap_err();
    assert!(matches!(err, Error::MissingIe { .. }));

    let mut wire = [0x00u8, 0x03, 0x05, 0x06, 0x07];
    let mut dec = Decoder::new(&mut wire);
    let mut decoded = MultiField::<Value<1>, 8>::new();
    dec.counted_multi("items", 2, Meta::NONE, &mut decoded, 2, usize::MAX).unwrap();
    assert_eq!(decoded.count(), 3);
}

// S6: inclusive vs. exclusive padding measuring different spans for the
// same envelope-plus-payload container.

// Both modes pad the same 1-byte tag + 1-byte length + 3-byte payload
// envelope to the same 8-byte total (the next multiple of the 4-byte
// quantum at or above 5); they disagree only about what the length
// placeholder reports, since `Inclusive` counts the as-yet-unwritten
// filler toward the span and `Exclusive` does not.
fn encode_padded_tlv(mode: PaddingMode) -> ([u8; 8], usize) {
    let mut data = [0u8; 8];
    let mut enc = Encoder::new(&mut data);
    let start = enc.offset();
    enc.begin_container();
    enc.buffer_mut().push("tag", 0x30).unwrap();
    enc.reserve_placeholder("len", LenSpec::new(1), true).unwrap();
    enc.buffer_mut().push_slice("payload", &[1, 2, 3]).unwrap();
    enc.end_container("frame", start, Some(Padding::new(32, 0, mode))).unwrap();
    let total = enc.offset() - start;
    (data, total)
}

#[test]
fn s6_inclusive_padding_counts_envelope_bytes_toward_the_quantum() {
    let (data, total) = encode_padded_tlv(PaddingMode::Inclusive);
    assert_eq!(total, 8);
    assert_eq!(data[1], 7); // content_end(5) + filler(3) - reserved_at(1)
    assert_eq!(&data[2..5], &[1, 2, 3]);
    assert_eq!(&data[5..8], &[0, 0, 0]);
}

#[test]
fn s6_exclusive_padding_counts_only_the_payload_toward_the_quantum() {
    let (data, total) = encode_padded_tlv(PaddingMode::Exclusive);
    assert_eq!(total, 8); // same total frame size as the inclusive variant
    assert_eq!(data[1], 4); // content_end(5) - reserved_at(1), padding excluded
    assert_eq!(&data[2..5], &[1, 2, 3]);
    assert_eq!(&data[5..8], &[0, 0, 0]); // identical filler either way
}

#[test]
fn encode_sequence_helper_exercises_placeholder_and_padding_together() {
    let mut data = [0u8; 8];
    let mut enc = Encoder::new(&mut data);
    encode_sequence(&mut enc, "frame", Some(Padding::new(32, 0, PaddingMode::Exclusive)), |enc| {
        enc.buffer_mut().push_slice("payload", &[9, 9, 9]).unwrap();
        Ok(())
    })
    .unwrap();
    assert_eq!(enc.offset(), 4);
    assert_eq!(&data[..4], &[9, 9, 9, 0]);
}
