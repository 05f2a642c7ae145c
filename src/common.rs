use crate::error::DecodeError;

// pub constants — encoded lengths of the structures handled by this crate

// From https://docs.microsoft.com/en-us/openspecs/windows_protocols/ms-dtyp/4926e530-816e-41c2-b251-ec5c7aca018a
pub const GUID_LENGTH : usize = 16;

// A SID is 8 header bytes (revision, sub-authority count, 48-bit authority)
// followed by 4 bytes per sub-authority
// From https://docs.microsoft.com/en-us/openspecs/windows_protocols/ms-dtyp/78eb9013-1c3a-4970-ad1f-2b1dad588a25
pub const SID_HEADER_LENGTH : usize = 8;
pub const SUB_AUTHORITY_LENGTH : usize = 4;
pub const SID_MAX_SUB_AUTHORITIES : usize = 255;

// Largest value a 48-bit field (SID authority, fifth GUID group) can hold
pub const U48_MAX : u64 = (1 << 48) - 1;

// From https://docs.microsoft.com/en-us/openspecs/windows_protocols/ms-dtyp/7a53f60e-e730-4dfe-bbe9-b21b62eb790b
pub const ACCESS_MASK_LENGTH : usize = 4;

// From https://docs.microsoft.com/en-us/openspecs/windows_protocols/ms-dtyp/628ebb1d-c509-4ea0-a10f-77ef97ca4586
pub const ACE_HEADER_LENGTH : usize = 4;

// From https://docs.microsoft.com/en-us/openspecs/windows_protocols/ms-dtyp/20233ed8-a6c6-4097-aafa-dd545ed24428
pub const ACL_HEADER_LENGTH : usize = 8;

// From https://docs.microsoft.com/en-us/windows/win32/fileio/file-attribute-constants
pub const FILE_ATTRIBUTE_FLAGS_LENGTH : usize = 4;

// From https://docs.microsoft.com/en-us/windows/win32/devnotes/mft-segment-reference
pub const FILE_REFERENCE_LENGTH : usize = 8;

// From https://docs.microsoft.com/en-us/windows/win32/api/minwinbase/ns-minwinbase-filetime
pub const FILE_TIME_LENGTH : usize = 8;

/// Every decode checks the buffer up front, before any field is read.
pub(crate) fn require(slice : &[u8], needed : usize) -> Result<(), DecodeError> {
    if slice.len() < needed {
        Err(DecodeError::TruncatedInput { needed, available: slice.len() })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_reports_sizes() {
        let buffer = [0u8; 6];

        assert_eq!(require(&buffer, 6), Ok(()));
        assert_eq!(
            require(&buffer, 8),
            Err(DecodeError::TruncatedInput { needed: 8, available: 6 })
        );
    }
}
