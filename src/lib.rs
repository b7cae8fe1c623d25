/*
 Biological sequence output in many formats
*/

pub mod error;
pub mod feature;
pub mod io;
pub mod seq;

#[cfg(test)]
mod test;

pub use self::error::{SeqoutError, SeqoutResult};
pub use self::feature::{FeatureError, FeatureRequest, FeatureTable};
pub use self::io::output::{Seqout, OutputKind, OutputOptions};
pub use self::io::{CompressionFormat, FormatInfo, QualFormat, SeqFormat};
pub use self::seq::{Seq, SeqSet, SeqType};
