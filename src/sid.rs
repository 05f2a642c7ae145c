use byteorder::*;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

use crate::common::*;
use crate::error::DecodeError;

/// A Windows security identifier (user, group, or other trustee), as stored
/// in NTFS security descriptor streams.
///
/// The on-disk form is self-sizing: one revision byte, one sub-authority
/// count byte, a 48-bit big-endian authority, then `count` little-endian
/// 32-bit sub-authorities. The string form of the builtin Administrators
/// group looks like:
///
/// ```text
/// S-1-5-32-544
/// ```
///
/// where `1` is the revision, `5` the authority (SECURITY_NT_AUTHORITY), `32`
/// the builtin domain and `544` the Administrators alias. The sub-authority
/// count never appears in the string form and is always derived from the
/// sub-authority list itself, so the two cannot fall out of sync.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sid {
    revision : u8,
    authority : u64, // 48-bit
    sub_authorities : Vec<u32>,
}

impl Sid {
    /// Returns `None` if `authority` does not fit in 48 bits or there are
    /// more sub-authorities than the count byte can declare.
    pub fn new(revision : u8, authority : u64, sub_authorities : Vec<u32>) -> Option<Self> {
        if authority > U48_MAX || sub_authorities.len() > SID_MAX_SUB_AUTHORITIES {
            return None;
        }

        Some(Sid { revision, authority, sub_authorities })
    }

    /// Decodes a SID from the start of `slice` and returns it together with
    /// the number of bytes consumed, so a caller walking a buffer of
    /// variable-length structures can advance its cursor.
    pub fn from_bytes(slice : &[u8]) -> Result<(Self, usize), DecodeError> {
        require(slice, SID_HEADER_LENGTH)?;

        let revision = slice[0];
        let sub_authority_count = slice[1] as usize;
        let encoded_length = SID_HEADER_LENGTH + sub_authority_count * SUB_AUTHORITY_LENGTH;

        require(slice, encoded_length)?;

        trace!("sid: revision {}, {} sub-authorities, {} bytes", revision, sub_authority_count, encoded_length);

        let authority = BigEndian::read_u48(&slice[2..8]);

        let mut sub_authorities = Vec::with_capacity(sub_authority_count);
        for chunk in slice[SID_HEADER_LENGTH..encoded_length].chunks_exact(SUB_AUTHORITY_LENGTH) {
            sub_authorities.push(LittleEndian::read_u32(chunk));
        }

        Ok((Sid { revision, authority, sub_authorities }, encoded_length))
    }

    /// The count byte is written from the sub-authority list length, never
    /// from a stored field.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.encoded_length()];

        out[0] = self.revision;
        out[1] = self.sub_authorities.len() as u8;
        BigEndian::write_u48(&mut out[2..8], self.authority);

        for (chunk, sub_authority) in out[SID_HEADER_LENGTH..]
            .chunks_exact_mut(SUB_AUTHORITY_LENGTH)
            .zip(&self.sub_authorities)
        {
            LittleEndian::write_u32(chunk, *sub_authority);
        }

        out
    }

    pub fn encoded_length(&self) -> usize {
        SID_HEADER_LENGTH + self.sub_authorities.len() * SUB_AUTHORITY_LENGTH
    }

    pub fn get_revision(&self) -> u8 { self.revision }
    pub fn get_authority(&self) -> u64 { self.authority }
    pub fn get_sub_authorities(&self) -> &[u32] { &self.sub_authorities }
    pub fn get_sub_authority_count(&self) -> u8 { self.sub_authorities.len() as u8 }
}

impl fmt::Display for Sid {
    fn fmt(&self, f : &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}-{}", self.revision, self.authority)?;

        for sub_authority in &self.sub_authorities {
            write!(f, "-{}", sub_authority)?;
        }

        Ok(())
    }
}

fn parse_component<T : FromStr>(component : &str, what : &str) -> Result<T, DecodeError> {
    // Plain decimal digits only; integer FromStr would also take a leading '+'
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::MalformedString(format!(
            "SID {} {:?} is not a non-negative decimal integer",
            what, component
        )));
    }

    component.parse().map_err(|_| {
        DecodeError::MalformedString(format!("SID {} {:?} is out of range", what, component))
    })
}

impl FromStr for Sid {
    type Err = DecodeError;

    fn from_str(s : &str) -> Result<Self, Self::Err> {
        let components : Vec<&str> = s.trim().split('-').collect();

        // "S-<revision>-<authority>" is the shortest legal form; a SID with
        // no sub-authorities is valid
        if components.len() < 3 {
            return Err(DecodeError::MalformedString(format!(
                "expected at least S-<revision>-<authority>, got {:?}",
                s
            )));
        }

        if components[0] != "S" {
            return Err(DecodeError::MalformedString(format!(
                "SID string must start with literal \"S\", got {:?}",
                components[0]
            )));
        }

        let revision : u8 = parse_component(components[1], "revision")?;
        let authority : u64 = parse_component(components[2], "authority")?;

        if authority > U48_MAX {
            return Err(DecodeError::MalformedString(format!(
                "SID authority {} does not fit in 48 bits",
                authority
            )));
        }

        if components.len() - 3 > SID_MAX_SUB_AUTHORITIES {
            return Err(DecodeError::MalformedString(format!(
                "SID has {} sub-authorities, at most {} can be encoded",
                components.len() - 3,
                SID_MAX_SUB_AUTHORITIES
            )));
        }

        let mut sub_authorities = Vec::with_capacity(components.len() - 3);
        for component in &components[3..] {
            sub_authorities.push(parse_component(component, "sub-authority")?);
        }

        Ok(Sid { revision, authority, sub_authorities })
    }
}
