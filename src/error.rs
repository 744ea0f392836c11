use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    InvalidInput,
    Io,
    Internal,
    SearchExhausted,
}

/// A fatal design error. These abort the whole run; per-sequence problems are
/// reported as `SequenceRejection` instead and never surface here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignError {
    pub code: ErrorCode,
    pub message: String,
}

impl DesignError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidInput,
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Io,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Internal,
            message: message.into(),
        }
    }

    pub fn search_exhausted(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::SearchExhausted,
            message: message.into(),
        }
    }
}

impl fmt::Display for DesignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for DesignError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionCode {
    NoCompatibleEnzyme,
    RegionWithNoUniqueKmers,
}

impl fmt::Display for RejectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionCode::NoCompatibleEnzyme => write!(f, "NO_COMPATIBLE_ENZYME"),
            RejectionCode::RegionWithNoUniqueKmers => write!(f, "REGION_WITH_NO_UNIQUE_KMERS"),
        }
    }
}

/// A recoverable, per-sequence failure. The offending sequence is excluded
/// from the pool and the batch continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRejection {
    pub code: RejectionCode,
    pub sequence_id: String,
}

impl SequenceRejection {
    pub fn no_compatible_enzyme(sequence_id: impl Into<String>) -> Self {
        Self {
            code: RejectionCode::NoCompatibleEnzyme,
            sequence_id: sequence_id.into(),
        }
    }

    pub fn region_with_no_unique_kmers(sequence_id: impl Into<String>) -> Self {
        Self {
            code: RejectionCode::RegionWithNoUniqueKmers,
            sequence_id: sequence_id.into(),
        }
    }
}

impl fmt::Display for SequenceRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.code, self.sequence_id)
    }
}
