// commands.rs — Command Layer: one method per protocol packet type.
//
// Each command validates the reply's packet id and payload length against
// the expected shape for that packet type before handing data back to the
// caller. Commands with no reply just send; the pipeline relies on TCP
// in-order delivery to surface any resulting error at the next replying
// command.

use netdimm_proto::{packet_id, DeviceInfo, FirmwareVersion, NetDimmError, Packet, Result};
use tracing::trace;

use crate::session::Session;

fn protocol_error(what: &str) -> NetDimmError {
    NetDimmError::Protocol(what.to_string())
}

fn expect_reply(reply: &Packet, id: u8, length: usize, what: &str) -> Result<()> {
    if reply.id != id {
        return Err(protocol_error(&format!(
            "{what}: expected reply id {id:#04x}, got {:#04x}",
            reply.id
        )));
    }
    if reply.len() != length {
        return Err(protocol_error(&format!(
            "{what}: expected reply payload of {length} bytes, got {}",
            reply.len()
        )));
    }
    Ok(())
}

impl Session {
    /// 0x11 — write a 32-bit word to an absolute host memory address. No reply.
    pub fn host_poke32(&mut self, addr: u32, value: u32) -> Result<()> {
        let mut data = Vec::with_capacity(12);
        data.extend_from_slice(&addr.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&value.to_le_bytes());
        trace!(addr, value, "host_poke32");
        self.send_packet(&Packet::new(packet_id::HOST_POKE32, 0x00, data))
    }

    /// 0x07 — read-modify-write exchange on the host mode register.
    /// `new = (old & mask) | set`; returns `new & 0xFF`.
    pub fn exchange_host_mode(&mut self, mask: u8, set: u8) -> Result<u8> {
        self.exchange_mode(packet_id::EXCHANGE_HOST_MODE, mask, set)
    }

    /// 0x08 — same read-modify-write exchange, on the DIMM mode register.
    pub fn exchange_dimm_mode(&mut self, mask: u8, set: u8) -> Result<u8> {
        self.exchange_mode(packet_id::EXCHANGE_DIMM_MODE, mask, set)
    }

    fn exchange_mode(&mut self, id: u8, mask: u8, set: u8) -> Result<u8> {
        let word = ((mask as u32) << 8) | (set as u32);
        self.send_packet(&Packet::new(id, 0x00, word.to_le_bytes().to_vec()))?;

        let reply = self.recv_packet()?;
        expect_reply(&reply, id, 4, "mode exchange")?;

        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&reply.data);
        Ok((u32::from_le_bytes(bytes) & 0xFF) as u8)
    }

    /// Convenience: set the host mode unconditionally (`mask = 0`).
    pub fn set_host_mode(&mut self, mode: u8) -> Result<()> {
        self.exchange_host_mode(0x00, mode)?;
        Ok(())
    }

    /// 0x7F — set the DES key code. Must be exactly 8 bytes. No reply.
    pub fn set_key_code(&mut self, key: [u8; 8]) -> Result<()> {
        self.send_packet(&Packet::new(packet_id::SET_KEY_CODE, 0x00, key.to_vec()))
    }

    /// 0x04 — upload one chunk. `last_chunk` selects flags 0x81 vs 0x80. No reply.
    pub fn upload_chunk(&mut self, seq: u32, addr: u32, data: &[u8], last_chunk: bool) -> Result<()> {
        let mut payload = Vec::with_capacity(10 + data.len());
        payload.extend_from_slice(&seq.to_le_bytes());
        payload.extend_from_slice(&addr.to_le_bytes());
        payload.extend_from_slice(&0u16.to_le_bytes());
        payload.extend_from_slice(data);
        let flags = if last_chunk { 0x81 } else { 0x80 };
        self.send_packet(&Packet::new(packet_id::UPLOAD_CHUNK, flags, payload))
    }

    /// 0x05 — request a range of DIMM memory, reading the streamed 0x04
    /// reply packets until the final-chunk flag bit is set.
    pub fn download_chunk_request(&mut self, addr: u32, size: u32) -> Result<Vec<u8>> {
        let mut payload = Vec::with_capacity(8);
        payload.extend_from_slice(&addr.to_le_bytes());
        payload.extend_from_slice(&size.to_le_bytes());
        self.send_packet(&Packet::new(packet_id::DOWNLOAD_REQUEST, 0x00, payload))?;

        let mut data = Vec::new();
        loop {
            let chunk = self.recv_packet()?;
            if chunk.id != packet_id::UPLOAD_CHUNK {
                return Err(protocol_error("download: unexpected reply packet id"));
            }
            if chunk.len() <= 10 {
                return Err(protocol_error("download: reply payload too short"));
            }
            data.extend_from_slice(&chunk.data[10..]);
            if chunk.flags & 0x1 != 0 {
                return Ok(data);
            }
        }
    }

    /// 0x18 — query device info.
    pub fn get_info(&mut self) -> Result<DeviceInfo> {
        self.send_packet(&Packet::empty(packet_id::GET_INFO, 0x00))?;
        let reply = self.recv_packet()?;
        expect_reply(&reply, packet_id::GET_INFO, 12, "get_info")?;

        let unknown = u16::from_le_bytes([reply.data[0], reply.data[1]]);
        let version = u16::from_le_bytes([reply.data[2], reply.data[3]]);
        let game_memory_mb = u16::from_le_bytes([reply.data[4], reply.data[5]]);
        let dimm_memory_mb = u16::from_le_bytes([reply.data[6], reply.data[7]]);
        let crc = u32::from_le_bytes([reply.data[8], reply.data[9], reply.data[10], reply.data[11]]);

        let version_str = format!("{}.{:02}", (version >> 8) & 0xFF, version & 0xFF);

        Ok(DeviceInfo {
            current_game_crc: crc,
            dimm_memory_mb,
            firmware_version: FirmwareVersion::from_version_string(&version_str),
            available_game_memory: (game_memory_mb as u32) << 20,
            reserved: unknown,
        })
    }

    /// 0x19 — finalise an upload with the CRC and total length. No reply.
    pub fn set_info(&mut self, crc: u32, length: u32) -> Result<()> {
        let mut data = Vec::with_capacity(12);
        data.extend_from_slice(&crc.to_le_bytes());
        data.extend_from_slice(&length.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        self.send_packet(&Packet::new(packet_id::SET_INFO, 0x00, data))
    }

    /// 0x0A — reboot into the loaded game. No reply.
    pub fn restart(&mut self) -> Result<()> {
        self.send_packet(&Packet::empty(packet_id::RESTART, 0x00))
    }

    /// 0x17 — set the loading time limit in minutes (device clamps to < 10
    /// and multiplies by 60000; otherwise defaults to 60000). No reply.
    pub fn set_time_limit(&mut self, minutes: u32) -> Result<()> {
        self.send_packet(&Packet::new(
            packet_id::SET_TIME_LIMIT,
            0x00,
            minutes.to_le_bytes().to_vec(),
        ))
    }

    /// 0x09 — request the device close the connection. No reply.
    pub fn close_connection(&mut self) -> Result<()> {
        self.send_packet(&Packet::empty(packet_id::CLOSE, 0x00))
    }
}
