//! Permission bits
//!
//! Symbolic owner/group/other masks combined with `|`. They are plain Unix
//! mode bits; on other platforms applying them is a no-op.

use std::fs::File;
use std::io;

pub const READ: u32 = 0b100;
pub const WRITE: u32 = 0b010;
pub const EXECUTE: u32 = 0b001;

const OWNER_SHIFT: u32 = 6;
const GROUP_SHIFT: u32 = 3;
const OTHER_SHIFT: u32 = 0;

pub const OWNER_READ: u32 = READ << OWNER_SHIFT;
pub const OWNER_WRITE: u32 = WRITE << OWNER_SHIFT;
pub const OWNER_EXECUTE: u32 = EXECUTE << OWNER_SHIFT;
pub const OWNER_RW: u32 = OWNER_READ | OWNER_WRITE;
pub const OWNER_RWX: u32 = OWNER_RW | OWNER_EXECUTE;

pub const GROUP_READ: u32 = READ << GROUP_SHIFT;
pub const GROUP_WRITE: u32 = WRITE << GROUP_SHIFT;
pub const GROUP_EXECUTE: u32 = EXECUTE << GROUP_SHIFT;
pub const GROUP_RW: u32 = GROUP_READ | GROUP_WRITE;
pub const GROUP_RWX: u32 = GROUP_RW | GROUP_EXECUTE;

pub const OTHER_READ: u32 = READ << OTHER_SHIFT;
pub const OTHER_WRITE: u32 = WRITE << OTHER_SHIFT;
pub const OTHER_EXECUTE: u32 = EXECUTE << OTHER_SHIFT;
pub const OTHER_RW: u32 = OTHER_READ | OTHER_WRITE;
pub const OTHER_RWX: u32 = OTHER_RW | OTHER_EXECUTE;

pub const ALL_READ: u32 = OWNER_READ | GROUP_READ | OTHER_READ;
pub const ALL_WRITE: u32 = OWNER_WRITE | GROUP_WRITE | OTHER_WRITE;
pub const ALL_EXECUTE: u32 = OWNER_EXECUTE | GROUP_EXECUTE | OTHER_EXECUTE;
pub const ALL_RW: u32 = ALL_READ | ALL_WRITE;
// Every execute bit; earlier releases OR-ed in only the group execute bit (0o676).
pub const ALL_RWX: u32 = ALL_RW | ALL_EXECUTE;

/// Mode of every relocated file: owner and group read/write
pub const DEST_MODE: u32 = OWNER_RW | GROUP_RW;

/// Set the mode of an open file
#[cfg(unix)]
pub fn apply(file: &File, mode: u32) -> io::Result<()> {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(Permissions::from_mode(mode))
}

/// Set the mode of an open file
#[cfg(not(unix))]
pub fn apply(_file: &File, _mode: u32) -> io::Result<()> {
    Ok(())
}
