// policy.rs — Target Policy: the Triforce-only boot-ID bypass patch.
//
// Firmware-indexed tables of (address, 32-bit word) pokes. Not invoked for
// Chihiro or Naomi targets; the spec is explicit that this patch only
// applies to Triforce.

use crate::target::FirmwareVersion;

fn base_address(version: FirmwareVersion) -> Option<u32> {
    match version {
        FirmwareVersion::V1_07 => Some(0x8000_D8A0),
        FirmwareVersion::V2_03 | FirmwareVersion::V2_15 => Some(0x8000_CC6C),
        FirmwareVersion::V3_01 => Some(0x8000_DC5C),
        _ => None,
    }
}

/// Compute the sequence of (address, value) host pokes for the boot-ID
/// bypass, or `None` if this firmware isn't in the patch table — in which
/// case the caller must skip the patch silently rather than surface an error.
///
/// The 4th write's address is `base + 12`, which may be wrong (the original
/// script may have intended `base + 0`, an address the first write already
/// overwrote). Kept as `base + 12` and parameterised here rather than
/// silently corrected.
pub fn boot_id_patch(version: FirmwareVersion) -> Option<Vec<(u32, u32)>> {
    let base = base_address(version)?;

    if version == FirmwareVersion::V3_01 {
        Some(vec![(base, 0x4800_001C)])
    } else {
        Some(vec![
            (base, 0x4E80_0020),
            (base + 4, 0x3860_0000),
            (base + 8, 0x4E80_0020),
            (base + 12, 0x6000_0000),
        ])
    }
}
