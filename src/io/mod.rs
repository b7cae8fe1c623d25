pub use self::format::*;
pub use self::line_format::*;
pub use self::qual_format::*;
pub use self::snapshot::*;

pub mod checksum;
mod format;
mod line_format;
pub mod output;
mod qual_format;
mod snapshot;

pub const DEFAULT_IO_WRITER_BUFSIZE: usize = 1 << 16;
