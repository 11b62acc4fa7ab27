use proptest::prelude::*;

use zrp_primitives::base58;
use zrp_primitives::ec::Signature;
use zrp_primitives::util::{length_prefix, VarInt, WireReader, WireWriter};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn varint_encode_decode_roundtrip(value in any::<u64>()) {
        let encoded = VarInt(value).to_bytes();
        let (decoded, consumed) = VarInt::from_bytes(&encoded).unwrap();
        prop_assert_eq!(decoded.value(), value);
        prop_assert_eq!(consumed, encoded.len());
        prop_assert_eq!(encoded.len(), VarInt(value).length());
    }

    #[test]
    fn varint_reader_writer_agree(value in any::<u64>()) {
        let mut writer = WireWriter::new();
        writer.write_varint(VarInt(value));
        let data = writer.into_bytes();
        let mut reader = WireReader::new(&data);
        prop_assert_eq!(reader.read_varint().unwrap().value(), value);
        prop_assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn base58_check_roundtrip(payload in prop::collection::vec(any::<u8>(), 0..64)) {
        let encoded = base58::check_encode(&payload);
        let decoded = base58::check_decode(&encoded).unwrap();
        prop_assert_eq!(decoded, payload);
    }

    #[test]
    fn length_prefix_matches_len(data in prop::collection::vec(any::<u8>(), 0..=255)) {
        prop_assert_eq!(length_prefix(&data).unwrap() as usize, data.len());
    }

    #[test]
    fn der_roundtrip_preserves_scalars(
        r in prop::array::uniform32(any::<u8>()),
        s in prop::array::uniform32(any::<u8>()),
    ) {
        let sig = Signature::new(r, s);
        let der = sig.to_der();
        let parsed = Signature::from_der(&der).unwrap();
        prop_assert_eq!(parsed.r(), sig.r());
        prop_assert_eq!(parsed.s(), sig.s());
    }
}
