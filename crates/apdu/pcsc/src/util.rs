//! Utility functions for PC/SC operations

/// Registered application provider of PC/SC part 3 (`A0 00 00 03 06`), preceded by
/// its `4F 0C` tag and length, as found in the ATR of contactless storage tags
const PCSC_STORAGE_MARKER: [u8; 7] = [0x4F, 0x0C, 0xA0, 0x00, 0x00, 0x03, 0x06];

/// Whether a contactless ATR describes a storage tag rather than an ISO-DEP card
///
/// Readers synthesize `3B 8F 80 01 80 4F 0C A0 00 00 03 06 ...` for MIFARE Classic,
/// Ultralight and similar tags; ISO-DEP cards carry their historical bytes instead.
pub(crate) fn is_storage_tag_atr(atr: &[u8]) -> bool {
    atr.windows(PCSC_STORAGE_MARKER.len())
        .any(|window| window == PCSC_STORAGE_MARKER)
}
