// Target/firmware enumerations and the device-info record produced by get-info.

/// Hardware family the driver is talking to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetFamily {
    Chihiro,
    #[default]
    Naomi,
    Triforce,
}

/// Firmware version tag, derived from the device's get-info reply.
///
/// Unrecognised version strings map to `Unknown`; this fallback must stay
/// explicit rather than erroring, since an unrecognised firmware is routine,
/// not exceptional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirmwareVersion {
    #[default]
    Unknown,
    V1_07,
    V2_03,
    V2_15,
    V3_01,
    V4_01,
    V4_02,
}

impl FirmwareVersion {
    /// Parse the `"{major}.{minor:02}"` string the device's get-info reply formats.
    pub fn from_version_string(s: &str) -> Self {
        match s {
            "1.07" => Self::V1_07,
            "2.03" => Self::V2_03,
            "2.15" => Self::V2_15,
            "3.01" => Self::V3_01,
            "4.01" => Self::V4_01,
            "4.02" => Self::V4_02,
            _ => Self::Unknown,
        }
    }
}

/// Result of a `get_info` exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    /// CRC32 of the game image currently loaded on the device.
    pub current_game_crc: u32,
    /// Raw DIMM memory size field, in megabytes, as reported by the device.
    pub dimm_memory_mb: u16,
    /// Firmware version decoded from the reply's version field.
    pub firmware_version: FirmwareVersion,
    /// Bytes of game memory available (`game_memory_mb << 20`).
    pub available_game_memory: u32,
    /// The undocumented leading `u16` of the reply, stored opaquely.
    ///
    /// Observed as `0xC` on real hardware; its meaning is unknown and must
    /// not be asserted on.
    pub reserved: u16,
}
