//! Blocking TCP driver for NetDIMM arcade cartridge emulators: connects over
//! the wire framing and packet contracts from `netdimm-proto` to expose the
//! three operations callers need — query device info, upload a game image,
//! and reboot into it.

mod commands;
mod facade;
mod session;
mod stream;
mod upload;

pub use facade::NetDimm;
pub use netdimm_proto::{
    DeviceInfo, FirmwareVersion, NetDimmError, Result, TargetFamily, NETDIMM_PORT,
};
