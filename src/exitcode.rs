//! Process exit codes, following BSD sysexits.h

/// Command succeeded
pub const OK: i32 = 0;

/// Bad flags or a command that cannot run as given
pub const USAGE: i32 = 64;

/// Score table, selection or tree could not be processed
pub const DATAERR: i32 = 65;

/// Score table or snapshot file does not exist
pub const NOINPUT: i32 = 66;

/// Unexpected failure inside corix
pub const SOFTWARE: i32 = 70;

/// Reading or writing a file failed
pub const IOERR: i32 = 74;

/// Settings or taxonomy file is invalid
pub const CONFIG: i32 = 78;
