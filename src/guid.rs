use byteorder::*;
use std::fmt;
use std::str::FromStr;

use crate::common::*;
use crate::error::DecodeError;

/// Number of hex digits in each group of the canonical string form.
const GROUP_WIDTHS : [usize; 5] = [8, 4, 4, 4, 12];

/// A globally unique identifier as stored in NTFS metadata (object IDs,
/// security descriptor object ACEs).
///
/// The first four groups are little-endian integers; the fifth is a 48-bit
/// integer stored byte-reversed on disk, so reading it little-endian yields
/// the value the canonical string displays. A valid, full GUID is of the form:
///
/// ```text
///    (1)    (2)  (3)  (4)     (5)
/// 6B29FC40-CA47-1067-B31D-00DD010662DA
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Guid {
    group1 : u32,
    group2 : u16,
    group3 : u16,
    group4 : u16,
    group5 : u64, // 48-bit
}

impl Guid {
    /// Returns `None` if `group5` does not fit in 48 bits.
    pub fn new(group1 : u32, group2 : u16, group3 : u16, group4 : u16, group5 : u64) -> Option<Self> {
        if group5 > U48_MAX {
            return None;
        }

        Some(Guid { group1, group2, group3, group4, group5 })
    }

    pub fn from_bytes(slice : &[u8]) -> Result<Self, DecodeError> {
        require(slice, GUID_LENGTH)?;

        Ok(Guid {
            group1: LittleEndian::read_u32(&slice[0..4]),
            group2: LittleEndian::read_u16(&slice[4..6]),
            group3: LittleEndian::read_u16(&slice[6..8]),
            group4: LittleEndian::read_u16(&slice[8..10]),
            group5: LittleEndian::read_u48(&slice[10..16]),
        })
    }

    pub fn to_bytes(&self) -> [u8; GUID_LENGTH] {
        let mut out = [0u8; GUID_LENGTH];

        LittleEndian::write_u32(&mut out[0..4], self.group1);
        LittleEndian::write_u16(&mut out[4..6], self.group2);
        LittleEndian::write_u16(&mut out[6..8], self.group3);
        LittleEndian::write_u16(&mut out[8..10], self.group4);
        LittleEndian::write_u48(&mut out[10..16], self.group5);

        out
    }

    pub fn get_group1(&self) -> u32 { self.group1 }
    pub fn get_group2(&self) -> u16 { self.group2 }
    pub fn get_group3(&self) -> u16 { self.group3 }
    pub fn get_group4(&self) -> u16 { self.group4 }
    pub fn get_group5(&self) -> u64 { self.group5 }
}

impl fmt::Display for Guid {
    fn fmt(&self, f : &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08X}-{:04X}-{:04X}-{:04X}-{:012X}",
            self.group1, self.group2, self.group3, self.group4, self.group5
        )
    }
}

impl FromStr for Guid {
    type Err = DecodeError;

    fn from_str(s : &str) -> Result<Self, Self::Err> {
        let groups : Vec<&str> = s.split('-').collect();

        if groups.len() != GROUP_WIDTHS.len() {
            return Err(DecodeError::MalformedString(format!(
                "expected {} dash-separated GUID groups, got {}",
                GROUP_WIDTHS.len(),
                groups.len()
            )));
        }

        let mut values = [0u64; 5];

        for (value, (group, width)) in values.iter_mut().zip(groups.iter().zip(GROUP_WIDTHS)) {
            // Hex digits only; a group longer than its field is an overflow,
            // not a value to truncate
            if group.is_empty()
                || group.len() > width
                || !group.bytes().all(|b| b.is_ascii_hexdigit())
            {
                return Err(DecodeError::MalformedString(format!(
                    "GUID group {:?} is not {} or fewer hex digits",
                    group, width
                )));
            }

            *value = u64::from_str_radix(group, 16).map_err(|e| {
                DecodeError::MalformedString(format!("GUID group {:?}: {}", group, e))
            })?;
        }

        Ok(Guid {
            group1: values[0] as u32,
            group2: values[1] as u16,
            group3: values[2] as u16,
            group4: values[3] as u16,
            group5: values[4],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // "6B29FC40-CA47-1067-B31D-00DD010662DA" as it appears on disk
    const GUID_BYTES : [u8; 16] = [
        0x40, 0xFC, 0x29, 0x6B, // Group1, little-endian
        0x47, 0xCA, // Group2
        0x67, 0x10, // Group3
        0x1D, 0xB3, // Group4
        0xDA, 0x62, 0x06, 0x01, 0xDD, 0x00, // Group5, byte-reversed
    ];

    #[test]
    fn test_guid_decode() {
        let guid = Guid::from_bytes(&GUID_BYTES).unwrap();

        assert_eq!(guid.get_group1(), 0x6B29FC40);
        assert_eq!(guid.get_group2(), 0xCA47);
        assert_eq!(guid.get_group3(), 0x1067);
        assert_eq!(guid.get_group4(), 0xB31D);
        assert_eq!(guid.get_group5(), 0x00DD010662DA);
    }

    #[test]
    fn test_guid_binary_round_trip() {
        let guid = Guid::from_bytes(&GUID_BYTES).unwrap();

        assert_eq!(guid.to_bytes(), GUID_BYTES);
        assert_eq!(Guid::from_bytes(&guid.to_bytes()).unwrap(), guid);
    }

    #[test]
    fn test_guid_truncated() {
        let result = Guid::from_bytes(&GUID_BYTES[..15]);

        assert_eq!(
            result,
            Err(DecodeError::TruncatedInput { needed: 16, available: 15 })
        );
    }

    #[test]
    fn test_guid_string_round_trip() {
        let canonical = "6B29FC40-CA47-1067-B31D-00DD010662DA";
        let guid : Guid = canonical.parse().unwrap();

        assert_eq!(guid.get_group1(), 0x6B29FC40);
        assert_eq!(guid.get_group5(), 0x00DD010662DA);
        assert_eq!(guid.to_string(), canonical);
        assert_eq!(guid, Guid::from_bytes(&GUID_BYTES).unwrap());
    }

    #[test]
    fn test_guid_display_zero_pads() {
        let guid = Guid::new(0x0, 0x1, 0x2, 0x3, 0x4).unwrap();

        assert_eq!(guid.to_string(), "00000000-0001-0002-0003-000000000004");
    }

    #[test]
    fn test_guid_from_str_rejects_bad_group_counts() {
        assert!("6B29FC40-CA47-1067-B31D".parse::<Guid>().is_err());
        assert!("6B29FC40-CA47-1067-B31D-00DD010662DA-FF".parse::<Guid>().is_err());
        assert!("".parse::<Guid>().is_err());
    }

    #[test]
    fn test_guid_from_str_rejects_bad_groups() {
        // Non-hex digit
        assert!("6B29FC4G-CA47-1067-B31D-00DD010662DA".parse::<Guid>().is_err());
        // Nine digits cannot fit a 32-bit group
        assert!("16B29FC40-CA47-1067-B31D-00DD010662DA".parse::<Guid>().is_err());
        // Empty group
        assert!("-CA47-1067-B31D-00DD010662DA".parse::<Guid>().is_err());
        // Sign accepted by stock integer parsing must not sneak through
        assert!("+B29FC40-CA47-1067-B31D-00DD010662DA".parse::<Guid>().is_err());
    }

    #[test]
    fn test_guid_new_rejects_oversized_group5() {
        assert!(Guid::new(0, 0, 0, 0, 1 << 48).is_none());
        assert!(Guid::new(0, 0, 0, 0, (1 << 48) - 1).is_some());
    }
}
