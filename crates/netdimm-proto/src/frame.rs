// Frame Codec — packs/unpacks the 4-byte NetDIMM wire header and payload.
//
// Header is a single little-endian u32:
//   bits 31..24 packet id
//   bits 23..16 flags
//   bits 15..0  payload length in bytes
//
// Pure encode/decode, no I/O. The `Packet::decode` half only parses the
// header; callers read the payload separately once they know its length
// (see `netdimm-client`'s `BlockingStream`).

pub const HEADER_LEN: usize = 4;

/// A single NetDIMM wire packet: 1-byte id, 1-byte flags, payload up to 65535 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub id: u8,
    pub flags: u8,
    pub data: Vec<u8>,
}

impl Packet {
    pub fn new(id: u8, flags: u8, data: Vec<u8>) -> Self {
        Self { id, flags, data }
    }

    pub fn empty(id: u8, flags: u8) -> Self {
        Self::new(id, flags, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Encode the 4-byte header followed by the payload.
    ///
    /// Panics if `data.len()` exceeds `u16::MAX`; that's a programmer error
    /// (every upload chunk is capped at 0x8000 bytes), not a runtime failure.
    pub fn encode(&self) -> Vec<u8> {
        let len = u16::try_from(self.data.len()).expect("packet payload exceeds 65535 bytes");
        let mut out = Vec::with_capacity(HEADER_LEN + self.data.len());
        out.extend_from_slice(&encode_header(self.id, self.flags, len));
        out.extend_from_slice(&self.data);
        out
    }
}

/// Encode a header in isolation, as little-endian bytes.
pub fn encode_header(id: u8, flags: u8, length: u16) -> [u8; HEADER_LEN] {
    let word = ((id as u32) << 24) | ((flags as u32) << 16) | (length as u32);
    word.to_le_bytes()
}

/// Decode a 4-byte header into (id, flags, payload length).
pub fn decode_header(bytes: [u8; HEADER_LEN]) -> (u8, u8, u16) {
    let word = u32::from_le_bytes(bytes);
    let id = ((word >> 24) & 0xFF) as u8;
    let flags = ((word >> 16) & 0xFF) as u8;
    let length = (word & 0xFFFF) as u16;
    (id, flags, length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn header_round_trip_known_values() {
        let (id, flags, len) = decode_header(encode_header(0x18, 0x00, 12));
        assert_eq!((id, flags, len), (0x18, 0x00, 12));
    }

    #[test]
    fn upload_chunk_header_flags() {
        let (_, flags, _) = decode_header(encode_header(0x04, 0x80, 0x8000));
        assert_eq!(flags, 0x80);
        let (_, flags, _) = decode_header(encode_header(0x04, 0x81, 0x1234));
        assert_eq!(flags, 0x81);
    }

    #[test]
    fn encode_packet_prefixes_length_correctly() {
        let packet = Packet::new(0x19, 0x00, vec![1, 2, 3, 4]);
        let bytes = packet.encode();
        assert_eq!(bytes.len(), HEADER_LEN + 4);
        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&bytes[..HEADER_LEN]);
        let (id, flags, len) = decode_header(header);
        assert_eq!((id, flags, len), (0x19, 0x00, 4));
    }

    proptest! {
        // Frame round-trip for every (id, flags, length).
        #[test]
        fn header_round_trip_any_value(id: u8, flags: u8, length: u16) {
            let (d_id, d_flags, d_len) = decode_header(encode_header(id, flags, length));
            prop_assert_eq!(d_id, id);
            prop_assert_eq!(d_flags, flags);
            prop_assert_eq!(d_len, length);
        }

        #[test]
        fn packet_encode_length_matches_payload(id: u8, flags: u8, data in proptest::collection::vec(any::<u8>(), 0..=4096)) {
            let packet = Packet::new(id, flags, data.clone());
            let bytes = packet.encode();
            let mut header = [0u8; HEADER_LEN];
            header.copy_from_slice(&bytes[..HEADER_LEN]);
            let (_, _, len) = decode_header(header);
            prop_assert_eq!(len as usize, data.len());
            prop_assert_eq!(&bytes[HEADER_LEN..], &data[..]);
        }
    }
}
