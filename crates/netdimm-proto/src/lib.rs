//! Wire framing, packet contracts, and target policy for the NetDIMM
//! protocol: the pieces common to any driver that talks to the device,
//! independent of the blocking-socket transport that drives them.

pub mod crc;
pub mod crypto;
pub mod error;
pub mod frame;
pub mod policy;
pub mod target;

pub use crc::UploadCrc;
pub use crypto::Cipher;
pub use error::{NetDimmError, Result};
pub use frame::{Packet, HEADER_LEN};
pub use target::{DeviceInfo, FirmwareVersion, TargetFamily};

/// Chunk size for the upload pipeline: 32 KiB.
pub const UPLOAD_CHUNK_SIZE: usize = 0x8000;

/// NetDIMM's fixed TCP port.
pub const NETDIMM_PORT: u16 = 10703;

/// Known packet ids.
pub mod packet_id {
    pub const STARTUP: u8 = 0x01;
    pub const UPLOAD_CHUNK: u8 = 0x04;
    pub const DOWNLOAD_REQUEST: u8 = 0x05;
    pub const EXCHANGE_HOST_MODE: u8 = 0x07;
    pub const EXCHANGE_DIMM_MODE: u8 = 0x08;
    pub const CLOSE: u8 = 0x09;
    pub const RESTART: u8 = 0x0A;
    pub const HOST_POKE32: u8 = 0x11;
    pub const SET_TIME_LIMIT: u8 = 0x17;
    pub const GET_INFO: u8 = 0x18;
    pub const SET_INFO: u8 = 0x19;
    pub const SET_KEY_CODE: u8 = 0x7F;
}

/// Known host-mode values observed in practice.
pub mod host_mode {
    pub const RUNNING: u32 = 0;
    pub const LOADING_TRANSITION: u32 = 1;
    pub const LOADING_IDLE: u32 = 2;
    pub const LOADING_TRANSFER_INITIATED: u32 = 10;
    pub const LOADING_TRANSFER_IN_PROGRESS: u32 = 20;
}
