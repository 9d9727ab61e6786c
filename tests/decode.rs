//! Integration tests: whole-buffer decoding through the public API, event order,
//! container exactness, truncation and nesting limits.

use asn1dump::{
    decode_events, decode_slice, decode_slice_with_config, DecodeError, Decoder, DecoderConfig,
    DumpVisitor, Event, EventCollector, OidStyle,
};

/// Encode one TLV with a definite length (short or long form).
fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    let len = content.len();
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let be = (len as u64).to_be_bytes();
        let skip = be.iter().position(|&b| b != 0).unwrap_or(7);
        out.push(0x80 | (8 - skip) as u8);
        out.extend_from_slice(&be[skip..]);
    }
    out.extend_from_slice(content);
    out
}

fn cat(parts: &[Vec<u8>]) -> Vec<u8> {
    parts.concat()
}

/// A certificate-shaped structure using only the supported element types.
fn tbs_certificate() -> Vec<u8> {
    let version = cat(&[vec![0xa0, 0x03], tlv(0x02, &[0x02])]);
    let serial = tlv(0x02, &[0x00, 0xc3, 0x4f, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e, 0x6f]);
    let sha256_rsa = tlv(0x06, &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b]);
    let algorithm = tlv(0x30, &cat(&[sha256_rsa, tlv(0x05, &[])]));
    let cn = tlv(0x30, &cat(&[tlv(0x06, &[0x55, 0x04, 0x03]), tlv(0x13, b"Test CA")]));
    let issuer = tlv(0x30, &tlv(0x31, &cn));
    let validity = tlv(
        0x30,
        &cat(&[tlv(0x17, b"200101000000Z"), tlv(0x17, b"300101000000Z")]),
    );
    let key = tlv(0x03, &[0x00, 0xab, 0xcd, 0xef]);
    tlv(0x30, &cat(&[version, serial, algorithm, issuer, validity, key]))
}

fn oid(arcs: &[&[u8]]) -> Event {
    Event::Oid(arcs.iter().map(|a| a.to_vec()).collect())
}

#[test]
fn certificate_event_sequence() {
    let events = decode_events(&tbs_certificate()).expect("decode");
    let expected = vec![
        Event::SequenceStart,
        Event::Constructed,
        Event::Integer { magnitude: vec![0x02], negative: false },
        Event::Integer {
            magnitude: vec![0xc3, 0x4f, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e, 0x6f],
            negative: false,
        },
        Event::SequenceStart,
        oid(&[&[1], &[2], &[0x03, 0x48], &[0x01, 0xbb, 0x8d], &[1], &[1], &[11]]),
        Event::Null,
        Event::SequenceEnd,
        Event::SequenceStart,
        Event::SetStart,
        Event::SequenceStart,
        oid(&[&[2], &[5], &[4], &[3]]),
        Event::PrintableString("Test CA".to_string()),
        Event::SequenceEnd,
        Event::SetEnd,
        Event::SequenceEnd,
        Event::SequenceStart,
        Event::UtcTime("200101000000Z".to_string()),
        Event::UtcTime("300101000000Z".to_string()),
        Event::SequenceEnd,
        Event::BitString(vec![0xab, 0xcd, 0xef]),
        Event::SequenceEnd,
    ];
    assert_eq!(events, expected);
}

#[test]
fn certificate_dump_text() {
    let mut dump = DumpVisitor::new(Vec::new())
        .with_indent(1)
        .with_oid_style(OidStyle::Dotted);
    decode_slice(&tbs_certificate(), &mut dump).expect("decode");
    let text = String::from_utf8(dump.finish().expect("finish")).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "SEQUENCE(");
    assert_eq!(lines[1], " (constructed)");
    assert_eq!(lines[3], " INTEGER c34f1a2b3c4d5e6f");
    assert_eq!(lines[5], "  OID(1.2.840.113549.1.1.11)");
    assert_eq!(lines[12], "    PrintableString Test CA");
    assert_eq!(*lines.last().unwrap(), ")");
}

#[test]
fn rsadsi_oid_components() {
    let events = decode_events(&[0x06, 0x06, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d]).unwrap();
    let arcs = events[0].as_oid().expect("oid");
    let values: Vec<u128> = arcs
        .iter()
        .map(|a| asn1dump::value::unsigned_to_u128(a).unwrap())
        .collect();
    assert_eq!(values, vec![1, 2, 840, 113549]);
}

#[test]
fn integer_examples() {
    let zero = decode_events(&[0x02, 0x01, 0x00]).unwrap();
    assert_eq!(zero[0].as_i128(), Some(0));
    assert_eq!(zero[0], Event::Integer { magnitude: vec![], negative: false });

    let min8 = decode_events(&[0x02, 0x01, 0x80]).unwrap();
    assert_eq!(min8[0], Event::Integer { magnitude: vec![0x80], negative: true });

    let neg255 = decode_events(&[0x02, 0x02, 0xff, 0x01]).unwrap();
    assert_eq!(neg255[0], Event::Integer { magnitude: vec![0xff], negative: true });
    assert_eq!(neg255[0].as_i128(), Some(-255));
}

#[test]
fn integer_matches_native_twos_complement() {
    for v in [-65536i64, -32769, -32768, -257, -256, -129, -128, -1, 0, 1, 127, 128, 255, 65535] {
        let be = v.to_be_bytes();
        // minimal two's-complement encoding
        let mut start = 0;
        while start < 7
            && ((be[start] == 0x00 && be[start + 1] & 0x80 == 0)
                || (be[start] == 0xff && be[start + 1] & 0x80 != 0))
        {
            start += 1;
        }
        let events = decode_events(&tlv(0x02, &be[start..])).unwrap();
        assert_eq!(events[0].as_i128(), Some(v as i128), "value {}", v);
    }
}

#[test]
fn long_form_length() {
    let nulls: Vec<u8> = std::iter::repeat([0x05u8, 0x00]).take(200).flatten().collect();
    let data = tlv(0x30, &nulls);
    assert_eq!(&data[..4], &[0x30, 0x82, 0x01, 0x90]);
    let events = decode_events(&data).unwrap();
    assert_eq!(events.len(), 202);
    assert!(events[1..201].iter().all(|e| *e == Event::Null));
}

#[test]
fn container_length_must_be_exact() {
    let good = [0x30, 0x05, 0x02, 0x01, 0x07, 0x05, 0x00];
    assert!(decode_events(&good).is_ok());

    let mut short = good;
    short[1] = 0x04;
    assert_eq!(decode_events(&short).unwrap_err().error, DecodeError::ElementsTooBig);

    let mut long = good.to_vec();
    long[1] = 0x06;
    assert_eq!(decode_events(&long).unwrap_err().error, DecodeError::Truncated);
    long.extend([0x05, 0x00]);
    assert_eq!(decode_events(&long).unwrap_err().error, DecodeError::ElementsTooBig);
}

#[test]
fn sibling_events_survive_a_later_error() {
    let data = [0x05, 0x00, 0x02, 0x01, 0x01, 0x04, 0x00];
    let mut c = EventCollector::new();
    let err = decode_slice(&data, &mut c).unwrap_err();
    assert_eq!(err.error, DecodeError::UnknownTag(0x04));
    assert_eq!(err.offset, 7);
    assert_eq!(c.events.len(), 2);
}

#[test]
fn every_truncated_prefix_fails_cleanly() {
    let data = tbs_certificate();
    assert_eq!(decode_events(&data[..0]), Ok(vec![]));
    for n in 1..data.len() {
        let err = decode_events(&data[..n]).unwrap_err();
        assert_eq!(err.error, DecodeError::Truncated, "prefix {}", n);
        assert!(err.offset <= n);
    }
}

#[test]
fn mutated_inputs_never_panic() {
    let base = tbs_certificate();
    let mut state: u32 = 0x1234_5678;
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };
    for _ in 0..2000 {
        let mut data = base.clone();
        for _ in 0..3 {
            let i = next() as usize % data.len();
            data[i] = next() as u8;
        }
        let cut = next() as usize % (data.len() + 1);
        let mut decoder = Decoder::new(&data[..cut]);
        let mut c = EventCollector::new();
        let _ = decoder.decode(&mut c);
        assert!(decoder.position() <= cut);
    }
}

#[test]
fn decoding_is_idempotent() {
    let data = tbs_certificate();
    assert_eq!(decode_events(&data), decode_events(&data));
}

#[test]
fn deep_nesting_is_bounded() {
    let mut data = tlv(0x05, &[]);
    for _ in 0..1000 {
        data = tlv(0x30, &data);
    }
    let err = decode_events(&data).unwrap_err();
    assert_eq!(err.error, DecodeError::MaxDepthExceeded(asn1dump::DEFAULT_MAX_DEPTH));

    let config = DecoderConfig { max_depth: 1000, ..DecoderConfig::default() };
    let mut c = EventCollector::new();
    decode_slice_with_config(&data, config, &mut c).expect("within limit");
    assert_eq!(c.events.len(), 2001);
}

#[test]
fn strict_class_rejects_context_tags() {
    let data = tbs_certificate();
    let config = DecoderConfig { class_aware_dispatch: true, ..DecoderConfig::default() };
    let mut c = EventCollector::new();
    let err = decode_slice_with_config(&data, config, &mut c).unwrap_err();
    assert_eq!(err.error, DecodeError::UnknownTag(0xa0));
    assert_eq!(c.events, vec![Event::SequenceStart]);
}
