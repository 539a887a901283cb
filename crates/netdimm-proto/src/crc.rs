// crc.rs — CRC32 over the upload ciphertext stream.
//
// Converted from: netboot/netboot.py's CRC accumulation in __upload_file.
// IEEE 802.3 CRC-32: init at all-ones, no ref-in/ref-out surprises, and the
// set-info report is the one's-complement of the running digest.

use crc::{Crc, Digest, CRC_32_ISO_HDLC};

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Running CRC32 accumulator over the upload's ciphertext stream.
pub struct UploadCrc<'a> {
    digest: Digest<'a, u32>,
}

impl<'a> UploadCrc<'a> {
    pub fn new() -> Self {
        Self { digest: CRC32.digest() }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.digest.update(data);
    }

    /// Finalise: one's-complement of the running CRC32, as the device expects
    /// it in the set-info packet.
    pub fn finalize(self) -> u32 {
        (!self.digest.finalize()) & 0xFFFF_FFFF
    }
}

impl<'a> Default for UploadCrc<'a> {
    fn default() -> Self {
        Self::new()
    }
}
