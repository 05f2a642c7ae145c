//! Decoders and encoders for the binary security-descriptor primitives NTFS
//! stores in its MFT and security descriptor streams: GUIDs, SIDs, ACE and
//! ACL headers, access masks, file attribute flags, FILETIMEs and MFT file
//! references.
//!
//! Every codec is a pure function over an in-memory byte slice positioned at
//! the start of its structure; locating those structures on a volume and
//! walking ACE lists is the caller's job. Decoded values are owned and
//! immutable, decoding never reads past a checked length, and encoding a
//! value that exists cannot fail.

pub mod access_control;
pub mod common;
pub mod error;
pub mod guid;
pub mod mft_types;
pub mod sid;

pub use access_control::{AccessMask, AceFlags, AceHeader, AceType, AclHeader};
pub use error::DecodeError;
pub use guid::Guid;
pub use mft_types::{FileAttributeFlags, FileReference, FileTime};
pub use sid::Sid;
