// upload.rs — Upload Pipeline: chunk, optionally encrypt, stream, finalise.
//
// Chunking drives encryption, encryption drives CRC accumulation, and CRC is
// reported in the trailing set-info packet — the three steps are kept in one
// pass over the payload rather than three separate passes, matching how the
// original walks the buffer once.

use netdimm_proto::{Cipher, NetDimmError, Result, UploadCrc, UPLOAD_CHUNK_SIZE};
use tracing::debug;

use crate::session::Session;

/// Upload `data` to DIMM memory starting at address 0, optionally
/// DES-encrypting each chunk, invoking `progress` before each chunk is sent,
/// and finalising with a set-info carrying the CRC over the transmitted
/// (ciphertext) stream.
///
/// `progress` receives `(bytes_sent_so_far, total_len)`.
pub fn upload(
    session: &mut Session,
    data: &[u8],
    cipher: &Cipher,
    mut progress: impl FnMut(usize, usize),
) -> Result<()> {
    if data.is_empty() {
        return Err(NetDimmError::InvalidArgument(
            "upload payload must not be empty".to_string(),
        ));
    }
    if cipher.is_active() && data.len() % 8 != 0 {
        return Err(NetDimmError::InvalidArgument(
            "upload payload length must be a multiple of 8 bytes when encrypting".to_string(),
        ));
    }

    let total = data.len();
    let mut addr = 0usize;
    let mut seq = 1u32;
    let mut crc = UploadCrc::new();

    while addr < total {
        let end = (addr + UPLOAD_CHUNK_SIZE).min(total);
        let slice = &data[addr..end];
        let last = end == total;

        progress(addr, total);

        let ciphertext = cipher.encrypt_chunk(slice)?;
        debug!(seq, addr, len = ciphertext.len(), last, "upload chunk");
        session.upload_chunk(seq, addr as u32, &ciphertext, last)?;
        crc.update(&ciphertext);

        addr = end;
        seq += 1;
    }

    let final_crc = crc.finalize();
    session.set_info(final_crc, total as u32)
}
