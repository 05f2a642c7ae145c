use byteorder::*;
use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::common::*;
use crate::error::DecodeError;

/// The DOS/NTFS file attribute flag set from $STANDARD_INFORMATION and
/// $FILE_NAME. Sixteen bits are named; the rest are kept verbatim so a
/// flag set decoded from a newer volume re-encodes byte-identically.
///
/// From https://docs.microsoft.com/en-us/windows/win32/fileio/file-attribute-constants
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileAttributeFlags(u32);

impl FileAttributeFlags {
    pub const READONLY : u32 = 0x00000001;
    pub const HIDDEN : u32 = 0x00000002;
    pub const SYSTEM : u32 = 0x00000004;
    pub const VOLUME : u32 = 0x00000008;
    pub const DIRECTORY : u32 = 0x00000010;
    pub const ARCHIVE : u32 = 0x00000020;
    pub const DEVICE : u32 = 0x00000040;
    pub const NORMAL : u32 = 0x00000080;
    pub const TEMPORARY : u32 = 0x00000100;
    pub const SPARSE_FILE : u32 = 0x00000200;
    pub const REPARSE_POINT : u32 = 0x00000400;
    pub const COMPRESSED : u32 = 0x00000800;
    pub const OFFLINE : u32 = 0x00001000;
    pub const NOT_CONTENT_INDEXED : u32 = 0x00002000;
    pub const ENCRYPTED : u32 = 0x00004000;
    pub const VIRTUAL : u32 = 0x00010000;

    pub fn from_bits(bits : u32) -> Self {
        FileAttributeFlags(bits)
    }

    pub fn from_bytes(slice : &[u8]) -> Result<Self, DecodeError> {
        require(slice, FILE_ATTRIBUTE_FLAGS_LENGTH)?;

        Ok(FileAttributeFlags(LittleEndian::read_u32(&slice[0..4])))
    }

    pub fn to_bytes(&self) -> [u8; FILE_ATTRIBUTE_FLAGS_LENGTH] {
        let mut out = [0u8; FILE_ATTRIBUTE_FLAGS_LENGTH];
        LittleEndian::write_u32(&mut out, self.0);
        out
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn is_readonly(&self) -> bool { self.0 & Self::READONLY != 0 }
    pub fn is_hidden(&self) -> bool { self.0 & Self::HIDDEN != 0 }
    pub fn is_system(&self) -> bool { self.0 & Self::SYSTEM != 0 }
    pub fn is_volume(&self) -> bool { self.0 & Self::VOLUME != 0 }
    pub fn is_directory(&self) -> bool { self.0 & Self::DIRECTORY != 0 }
    pub fn is_archive(&self) -> bool { self.0 & Self::ARCHIVE != 0 }
    pub fn is_device(&self) -> bool { self.0 & Self::DEVICE != 0 }
    pub fn is_normal(&self) -> bool { self.0 & Self::NORMAL != 0 }
    pub fn is_temporary(&self) -> bool { self.0 & Self::TEMPORARY != 0 }
    pub fn is_sparse_file(&self) -> bool { self.0 & Self::SPARSE_FILE != 0 }
    pub fn is_reparse_point(&self) -> bool { self.0 & Self::REPARSE_POINT != 0 }
    pub fn is_compressed(&self) -> bool { self.0 & Self::COMPRESSED != 0 }
    pub fn is_offline(&self) -> bool { self.0 & Self::OFFLINE != 0 }
    pub fn is_not_content_indexed(&self) -> bool { self.0 & Self::NOT_CONTENT_INDEXED != 0 }
    pub fn is_encrypted(&self) -> bool { self.0 & Self::ENCRYPTED != 0 }
    pub fn is_virtual(&self) -> bool { self.0 & Self::VIRTUAL != 0 }
}

/// Pointer from an MFT structure to a base (parent) MFT record; zero when the
/// record is itself the base record.
///
/// From https://docs.microsoft.com/en-us/windows/win32/devnotes/mft-segment-reference
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileReference {
    pub segment_number : u32,
    // 2 padding bytes
    pub sequence_number : u16,
}

impl FileReference {
    pub fn from_bytes(slice : &[u8]) -> Result<Self, DecodeError> {
        require(slice, FILE_REFERENCE_LENGTH)?;

        Ok(FileReference {
            segment_number: LittleEndian::read_u32(&slice[0..4]),
            sequence_number: LittleEndian::read_u16(&slice[6..8]),
        })
    }

    pub fn to_bytes(&self) -> [u8; FILE_REFERENCE_LENGTH] {
        let mut out = [0u8; FILE_REFERENCE_LENGTH];

        LittleEndian::write_u32(&mut out[0..4], self.segment_number);
        LittleEndian::write_u16(&mut out[6..8], self.sequence_number);

        out
    }
}

/// The two halves of a Windows FILETIME as they sit on disk. Consumers that
/// need the raw 64-bit tick count compose the halves themselves; consumers
/// that want a calendar timestamp use [`FileTime::to_datetime`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileTime {
    pub low_date_time : u32,
    pub high_date_time : u32,
}

impl FileTime {
    pub fn from_bytes(slice : &[u8]) -> Result<Self, DecodeError> {
        require(slice, FILE_TIME_LENGTH)?;

        Ok(FileTime {
            low_date_time: LittleEndian::read_u32(&slice[0..4]),
            high_date_time: LittleEndian::read_u32(&slice[4..8]),
        })
    }

    pub fn to_bytes(&self) -> [u8; FILE_TIME_LENGTH] {
        let mut out = [0u8; FILE_TIME_LENGTH];

        LittleEndian::write_u32(&mut out[0..4], self.low_date_time);
        LittleEndian::write_u32(&mut out[4..8], self.high_date_time);

        out
    }

    /// Windows FILETIME is a signed count of 100ns increments since
    /// 1601/01/01 00:00:00. The ticks are divided down to microseconds since
    /// nanoseconds would overflow a 64 bit int; `None` if the result falls
    /// outside chrono's representable range.
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        let epoch = NaiveDate::from_ymd_opt(1601, 1, 1)?.and_hms_opt(0, 0, 0)?;
        let ticks = (((self.high_date_time as u64) << 32) | self.low_date_time as u64) as i64;

        epoch.checked_add_signed(Duration::microseconds(ticks / 10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_attribute_flags_decode() {
        let flags = FileAttributeFlags::from_bytes(&[0x07, 0x00, 0x00, 0x00]).unwrap();

        assert!(flags.is_readonly());
        assert!(flags.is_hidden());
        assert!(flags.is_system());
        assert!(!flags.is_volume());
        assert!(!flags.is_directory());
        assert!(!flags.is_archive());
        assert!(!flags.is_virtual());

        // VIRTUAL sits past a 15-bit gap at 0x10000
        let flags = FileAttributeFlags::from_bytes(&[0x00, 0x00, 0x01, 0x00]).unwrap();
        assert!(flags.is_virtual());
        assert!(!flags.is_encrypted());
    }

    #[test]
    fn test_file_attribute_flags_preserve_unnamed_bits() {
        // 0x8000 and 0x20000 are unnamed; a round trip must not drop them
        let raw = [0x00, 0x80, 0x02, 0x00];
        let flags = FileAttributeFlags::from_bytes(&raw).unwrap();

        assert!(!flags.is_virtual());
        assert!(!flags.is_encrypted());
        assert_eq!(flags.bits(), 0x00028000);
        assert_eq!(flags.to_bytes(), raw);
    }

    #[test]
    fn test_file_attribute_flags_truncated() {
        assert_eq!(
            FileAttributeFlags::from_bytes(&[0x07]),
            Err(DecodeError::TruncatedInput { needed: 4, available: 1 })
        );
    }

    #[test]
    fn test_file_reference_round_trip() {
        let raw = [0x2A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x00];
        let reference = FileReference::from_bytes(&raw).unwrap();

        assert_eq!(reference.segment_number, 42);
        assert_eq!(reference.sequence_number, 5);
        assert_eq!(reference.to_bytes(), raw);
    }

    #[test]
    fn test_file_reference_padding_encodes_as_zero() {
        // Garbage in the padding bytes is not part of the value
        let raw = [0x2A, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0x05, 0x00];
        let reference = FileReference::from_bytes(&raw).unwrap();

        assert_eq!(reference.to_bytes(), [0x2A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x00]);
    }

    #[test]
    fn test_file_time_round_trip() {
        // 0x019DB1DED53E8000 ticks == 1970/01/01 00:00:00
        let raw = [0x00, 0x80, 0x3E, 0xD5, 0xDE, 0xB1, 0x9D, 0x01];
        let file_time = FileTime::from_bytes(&raw).unwrap();

        assert_eq!(file_time.low_date_time, 0xD53E8000);
        assert_eq!(file_time.high_date_time, 0x019DB1DE);
        assert_eq!(file_time.to_bytes(), raw);
    }

    #[test]
    fn test_file_time_truncated() {
        assert_eq!(
            FileTime::from_bytes(&[0x00, 0x80, 0x3E, 0xD5]),
            Err(DecodeError::TruncatedInput { needed: 8, available: 4 })
        );
    }

    #[test]
    fn test_file_time_to_datetime() {
        let unix_epoch = FileTime { low_date_time: 0xD53E8000, high_date_time: 0x019DB1DE };
        assert_eq!(
            unix_epoch.to_datetime(),
            NaiveDate::from_ymd_opt(1970, 1, 1).unwrap().and_hms_opt(0, 0, 0)
        );

        let filetime_epoch = FileTime { low_date_time: 0, high_date_time: 0 };
        assert_eq!(
            filetime_epoch.to_datetime(),
            NaiveDate::from_ymd_opt(1601, 1, 1).unwrap().and_hms_opt(0, 0, 0)
        );
    }

    #[test]
    fn test_file_time_is_signed() {
        // -10_000_000 ticks, one second before the FILETIME epoch
        let before_epoch = FileTime { low_date_time: 0xFF676980, high_date_time: 0xFFFFFFFF };
        assert_eq!(
            before_epoch.to_datetime(),
            NaiveDate::from_ymd_opt(1600, 12, 31).unwrap().and_hms_opt(23, 59, 59)
        );
    }
}
