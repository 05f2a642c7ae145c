use byteorder::*;
use tracing::trace;

use crate::common::*;
use crate::error::DecodeError;

/// The 32-bit ACCESS_MASK carried by every ACE.
///
/// The raw value is kept verbatim, so reserved and otherwise unnamed bits
/// survive a decode/encode round trip untouched. The named bits follow
/// Windows' ACCESS_MASK numbering exactly; this table is authoritative for
/// both directions:
///
/// ```text
/// bits  0-15  SpecificRights            0x0000FFFF
/// bit     16  DELETE                    0x00010000
/// bit     17  READ_CONTROL              0x00020000
/// bit     18  WRITE_DAC                 0x00040000
/// bit     19  WRITE_OWNER               0x00080000
/// bit     20  SYNCHRONIZE               0x00100000
/// bits 21-23  unnamed
/// bit     24  ACCESS_SYSTEM_SECURITY    0x01000000
/// bit     25  MAXIMUM_ALLOWED           0x02000000
/// bits 26-27  reserved
/// bit     28  GENERIC_ALL               0x10000000
/// bit     29  GENERIC_EXECUTE           0x20000000
/// bit     30  GENERIC_WRITE             0x40000000
/// bit     31  GENERIC_READ              0x80000000
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessMask(u32);

impl AccessMask {
    pub const SPECIFIC_RIGHTS_MASK : u32 = 0x0000FFFF;

    // Standard rights
    pub const DELETE : u32 = 0x00010000;
    pub const READ_CONTROL : u32 = 0x00020000;
    pub const WRITE_DAC : u32 = 0x00040000;
    pub const WRITE_OWNER : u32 = 0x00080000;
    pub const SYNCHRONIZE : u32 = 0x00100000;

    pub const ACCESS_SYSTEM_SECURITY : u32 = 0x01000000;
    pub const MAXIMUM_ALLOWED : u32 = 0x02000000;

    // Generic rights, mapped to object-specific rights by the consumer
    pub const GENERIC_ALL : u32 = 0x10000000;
    pub const GENERIC_EXECUTE : u32 = 0x20000000;
    pub const GENERIC_WRITE : u32 = 0x40000000;
    pub const GENERIC_READ : u32 = 0x80000000;

    pub fn from_bits(bits : u32) -> Self {
        AccessMask(bits)
    }

    /// Every 32-bit pattern is a valid mask; decode only fails on a short
    /// buffer.
    pub fn from_bytes(slice : &[u8]) -> Result<Self, DecodeError> {
        require(slice, ACCESS_MASK_LENGTH)?;

        Ok(AccessMask(LittleEndian::read_u32(&slice[0..4])))
    }

    pub fn to_bytes(&self) -> [u8; ACCESS_MASK_LENGTH] {
        let mut out = [0u8; ACCESS_MASK_LENGTH];
        LittleEndian::write_u32(&mut out, self.0);
        out
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    /// The object-specific rights in the low 16 bits, uninterpreted.
    pub fn get_specific_rights(&self) -> u16 {
        (self.0 & Self::SPECIFIC_RIGHTS_MASK) as u16
    }

    pub fn has_delete(&self) -> bool { self.0 & Self::DELETE != 0 }
    pub fn has_read_control(&self) -> bool { self.0 & Self::READ_CONTROL != 0 }
    pub fn has_write_dac(&self) -> bool { self.0 & Self::WRITE_DAC != 0 }
    pub fn has_write_owner(&self) -> bool { self.0 & Self::WRITE_OWNER != 0 }
    pub fn has_synchronize(&self) -> bool { self.0 & Self::SYNCHRONIZE != 0 }
    pub fn has_access_system_security(&self) -> bool { self.0 & Self::ACCESS_SYSTEM_SECURITY != 0 }
    pub fn has_maximum_allowed(&self) -> bool { self.0 & Self::MAXIMUM_ALLOWED != 0 }
    pub fn has_generic_all(&self) -> bool { self.0 & Self::GENERIC_ALL != 0 }
    pub fn has_generic_execute(&self) -> bool { self.0 & Self::GENERIC_EXECUTE != 0 }
    pub fn has_generic_write(&self) -> bool { self.0 & Self::GENERIC_WRITE != 0 }
    pub fn has_generic_read(&self) -> bool { self.0 & Self::GENERIC_READ != 0 }
}

/// ACE type codes. The code space is closed: a byte outside 0x00-0x11 fails
/// decoding with `UnknownEnumValue` rather than mapping to a catch-all
/// variant, so a caller never silently mis-walks an ACL built by a newer
/// Windows than this table knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AceType {
    AccessAllowed = 0x00,
    AccessDenied = 0x01,
    SystemAudit = 0x02,
    SystemAlarm = 0x03,
    AccessAllowedCompound = 0x04,
    AccessAllowedObject = 0x05,
    AccessDeniedObject = 0x06,
    SystemAuditObject = 0x07,
    SystemAlarmObject = 0x08,
    AccessAllowedCallback = 0x09,
    AccessDeniedCallback = 0x0A,
    AccessAllowedCallbackObject = 0x0B,
    AccessDeniedCallbackObject = 0x0C,
    SystemAuditCallback = 0x0D,
    SystemAlarmCallback = 0x0E,
    SystemAuditCallbackObject = 0x0F,
    SystemAlarmCallbackObject = 0x10,
    SystemMandatoryLabel = 0x11,
}

impl AceType {
    pub fn from_u8(value : u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::AccessAllowed),
            0x01 => Some(Self::AccessDenied),
            0x02 => Some(Self::SystemAudit),
            0x03 => Some(Self::SystemAlarm),
            0x04 => Some(Self::AccessAllowedCompound),
            0x05 => Some(Self::AccessAllowedObject),
            0x06 => Some(Self::AccessDeniedObject),
            0x07 => Some(Self::SystemAuditObject),
            0x08 => Some(Self::SystemAlarmObject),
            0x09 => Some(Self::AccessAllowedCallback),
            0x0A => Some(Self::AccessDeniedCallback),
            0x0B => Some(Self::AccessAllowedCallbackObject),
            0x0C => Some(Self::AccessDeniedCallbackObject),
            0x0D => Some(Self::SystemAuditCallback),
            0x0E => Some(Self::SystemAlarmCallback),
            0x0F => Some(Self::SystemAuditCallbackObject),
            0x10 => Some(Self::SystemAlarmCallbackObject),
            0x11 => Some(Self::SystemMandatoryLabel),
            _ => None,
        }
    }

    /// Object ACE bodies carry extra flag-dependent GUID fields this crate
    /// does not parse; callers should skip them via `AceHeader::ace_size`.
    pub fn is_object_type(&self) -> bool {
        matches!(
            self,
            Self::AccessAllowedObject
                | Self::AccessDeniedObject
                | Self::SystemAuditObject
                | Self::SystemAlarmObject
                | Self::AccessAllowedCallbackObject
                | Self::AccessDeniedCallbackObject
                | Self::SystemAuditCallbackObject
                | Self::SystemAlarmCallbackObject
        )
    }
}

/// ACE header flag byte. Six bits are named; the remaining two (0x10, 0x20)
/// are kept verbatim and never rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AceFlags(u8);

impl AceFlags {
    pub const OBJECT_INHERIT : u8 = 0x01;
    pub const CONTAINER_INHERIT : u8 = 0x02;
    pub const NO_PROPAGATE_INHERIT : u8 = 0x04;
    pub const INHERIT_ONLY : u8 = 0x08;
    pub const SUCCESSFUL_ACCESS : u8 = 0x40;
    pub const FAILED_ACCESS : u8 = 0x80;

    pub fn from_bits(bits : u8) -> Self {
        AceFlags(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_object_inherit(&self) -> bool { self.0 & Self::OBJECT_INHERIT != 0 }
    pub fn is_container_inherit(&self) -> bool { self.0 & Self::CONTAINER_INHERIT != 0 }
    pub fn is_no_propagate_inherit(&self) -> bool { self.0 & Self::NO_PROPAGATE_INHERIT != 0 }
    pub fn is_inherit_only(&self) -> bool { self.0 & Self::INHERIT_ONLY != 0 }
    pub fn is_successful_access(&self) -> bool { self.0 & Self::SUCCESSFUL_ACCESS != 0 }
    pub fn is_failed_access(&self) -> bool { self.0 & Self::FAILED_ACCESS != 0 }
}

/// The fixed 4-byte header every ACE starts with.
///
/// `ace_size` is the full encoded length of the ACE including this header;
/// walking an ACL means reading a header, handling (or skipping) the body,
/// and advancing by `ace_size`.
///
/// From https://docs.microsoft.com/en-us/openspecs/windows_protocols/ms-dtyp/628ebb1d-c509-4ea0-a10f-77ef97ca4586
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AceHeader {
    pub ace_type : AceType,
    pub ace_flags : AceFlags,
    pub ace_size : u16,
}

impl AceHeader {
    pub fn from_bytes(slice : &[u8]) -> Result<Self, DecodeError> {
        require(slice, ACE_HEADER_LENGTH)?;

        let ace_type = AceType::from_u8(slice[0]).ok_or(DecodeError::UnknownEnumValue(slice[0]))?;

        Ok(AceHeader {
            ace_type,
            ace_flags: AceFlags::from_bits(slice[1]),
            ace_size: LittleEndian::read_u16(&slice[2..4]),
        })
    }

    pub fn to_bytes(&self) -> [u8; ACE_HEADER_LENGTH] {
        let mut out = [0u8; ACE_HEADER_LENGTH];

        out[0] = self.ace_type as u8;
        out[1] = self.ace_flags.bits();
        LittleEndian::write_u16(&mut out[2..4], self.ace_size);

        out
    }
}

/// The 8-byte header in front of an ACL's ACE list.
///
/// Whether `acl_size` and `ace_count` agree with the ACE bytes that follow is
/// for the walking caller to establish; the header is reported verbatim.
///
/// From https://docs.microsoft.com/en-us/openspecs/windows_protocols/ms-dtyp/20233ed8-a6c6-4097-aafa-dd545ed24428
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AclHeader {
    pub acl_revision : u8,
    pub acl_size : u16,
    pub ace_count : u16,
}

impl AclHeader {
    pub fn from_bytes(slice : &[u8]) -> Result<Self, DecodeError> {
        require(slice, ACL_HEADER_LENGTH)?;

        let header = AclHeader {
            acl_revision: slice[0],
            // slice[1] is padding
            acl_size: LittleEndian::read_u16(&slice[2..4]),
            ace_count: LittleEndian::read_u16(&slice[4..6]),
            // slice[6..8] is padding
        };

        trace!("acl: revision {}, {} aces, {} bytes", header.acl_revision, header.ace_count, header.acl_size);

        Ok(header)
    }

    pub fn to_bytes(&self) -> [u8; ACL_HEADER_LENGTH] {
        let mut out = [0u8; ACL_HEADER_LENGTH];

        out[0] = self.acl_revision;
        LittleEndian::write_u16(&mut out[2..4], self.acl_size);
        LittleEndian::write_u16(&mut out[4..6], self.ace_count);

        out
    }
}
