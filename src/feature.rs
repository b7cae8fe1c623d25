//! Interface to the feature table writers.
//!
//! Feature tables are owned and serialized elsewhere. The output engine only
//! decides *where* in an annotated entry the table goes, and hands over a
//! [`FeatureRequest`] describing the entry being written.

use std::fmt::Debug;
use std::io;

use crate::seq::SeqType;

/// Describes the entry a feature table is written into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureRequest<'a> {
    /// Feature format name (e.g. "embl", "genbank", "swissprot", "gff3", "pir")
    pub format: &'static str,
    pub seq_name: &'a str,
    pub seqtype: SeqType,
    /// 1-based inclusive range of the original sequence that is written.
    /// Features outside of it are dropped and the remaining ones shifted
    /// so that `begin` becomes position 1.
    pub begin: usize,
    pub end: usize,
    pub reversed: bool,
}

#[derive(thiserror::Error, Debug)]
pub enum FeatureError {
    #[error("Feature format '{0}' is not supported by this feature table")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{0}")]
    Other(String),
}

/// A feature table attached to a sequence
pub trait FeatureTable: Debug {
    fn is_empty(&self) -> bool;

    fn write(&self, request: &FeatureRequest, out: &mut dyn io::Write) -> Result<(), FeatureError>;
}
