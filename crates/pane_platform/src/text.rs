//! UTF-16 text input assembly
//!
//! Platforms that report text as UTF-16 code units deliver characters outside
//! the Basic Multilingual Plane as two consecutive events. [`CodepointAssembler`]
//! pairs the halves back together and filters out control characters, which
//! travel through the key-down/key-up path instead.

use tracing::debug;

const HIGH_SURROGATES: std::ops::RangeInclusive<u16> = 0xD800..=0xDBFF;
const LOW_SURROGATES: std::ops::RangeInclusive<u16> = 0xDC00..=0xDFFF;

/// Highest code point treated as a control character
const LAST_CONTROL: u16 = 0x1F;

/// Stateful UTF-16 to codepoint reducer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CodepointAssembler {
    pending_high: Option<u16>,
}

impl CodepointAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one code unit, returning a character once one is complete
    pub fn push(&mut self, unit: u16) -> Option<char> {
        if HIGH_SURROGATES.contains(&unit) {
            if let Some(dropped) = self.pending_high.replace(unit) {
                debug!(unit = dropped, "dropping unpaired high surrogate");
            }
            return None;
        }

        if LOW_SURROGATES.contains(&unit) {
            let Some(high) = self.pending_high.take() else {
                debug!(unit, "dropping orphan low surrogate");
                return None;
            };
            let code = (((high - 0xD800) as u32) << 10 | (unit - 0xDC00) as u32) + 0x10000;
            return char::from_u32(code);
        }

        if let Some(dropped) = self.pending_high.take() {
            debug!(unit = dropped, "dropping unpaired high surrogate");
        }

        if unit <= LAST_CONTROL {
            return None;
        }

        char::from_u32(unit as u32)
    }

    /// Discard any stored high surrogate
    pub fn reset(&mut self) {
        if let Some(dropped) = self.pending_high.take() {
            debug!(unit = dropped, "discarding pending high surrogate");
        }
    }

    /// Whether a high surrogate is waiting for its pair
    pub fn is_pending(&self) -> bool {
        self.pending_high.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(assembler: &mut CodepointAssembler, units: &[u16]) -> Vec<char> {
        units.iter().filter_map(|&u| assembler.push(u)).collect()
    }

    #[test]
    fn test_surrogate_pair_yields_one_codepoint() {
        let mut assembler = CodepointAssembler::new();
        assert_eq!(assembler.push(0xD83D), None);
        assert!(assembler.is_pending());
        assert_eq!(assembler.push(0xDE00), Some('\u{1F600}'));
        assert!(!assembler.is_pending());
    }

    #[test]
    fn test_lone_low_surrogate_is_dropped() {
        let mut assembler = CodepointAssembler::new();
        assert_eq!(feed(&mut assembler, &[0xDE00]), vec![]);
    }

    #[test]
    fn test_control_unit_is_dropped() {
        let mut assembler = CodepointAssembler::new();
        assert_eq!(assembler.push(0x08), None);
        assert_eq!(assembler.push(0x1F), None);
        assert_eq!(assembler.push(0x20), Some(' '));
    }

    #[test]
    fn test_bmp_units_pass_through() {
        let mut assembler = CodepointAssembler::new();
        let units: Vec<u16> = "héllo €".encode_utf16().collect();
        assert_eq!(feed(&mut assembler, &units).into_iter().collect::<String>(), "héllo €");
    }

    #[test]
    fn test_reset_discards_pending_high() {
        let mut assembler = CodepointAssembler::new();
        assembler.push(0xD83D);
        assembler.reset();
        assert_eq!(assembler.push(0xDE00), None);
    }

    #[test]
    fn test_high_followed_by_bmp_unit() {
        let mut assembler = CodepointAssembler::new();
        assert_eq!(feed(&mut assembler, &[0xD83D, 0x41]), vec!['A']);
        assert!(!assembler.is_pending());
    }

    #[test]
    fn test_second_high_replaces_first() {
        let mut assembler = CodepointAssembler::new();
        assert_eq!(feed(&mut assembler, &[0xD83D, 0xD83C, 0xDF89]), vec!['\u{1F389}']);
    }
}
