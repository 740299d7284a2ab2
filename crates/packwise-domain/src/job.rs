//! Extraction job identity and lifecycle

use std::fmt;

/// Unique identifier for an extraction job based on UUIDv7
///
/// UUIDv7 keeps job identifiers chronologically sortable, which makes
/// interleaved log lines from concurrent uploads easy to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(u128);

impl JobId {
    /// Generate a new UUIDv7-based JobId
    ///
    /// # Examples
    ///
    /// ```
    /// use packwise_domain::JobId;
    ///
    /// let id = JobId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a JobId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a JobId from a UUID string
    ///
    /// # Examples
    ///
    /// ```
    /// use packwise_domain::JobId;
    ///
    /// let id = JobId::new();
    /// let parsed = JobId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid job id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Milliseconds since Unix epoch at which the job was created
    pub fn timestamp(&self) -> u64 {
        // UUIDv7: top 48 bits are Unix millisecond timestamp
        (self.0 >> 80) as u64
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Stage of an extraction job
///
/// ```text
/// Received → Normalizing → Filtering → Chunking → Extracting(1..N) → Deduplicating → Complete
/// ```
///
/// Jobs are never resumed: a failed job returns its best-effort partial
/// result and simply ends in `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStage {
    /// Document accepted, text not yet extracted
    Received,

    /// Noise patterns are being stripped
    Normalizing,

    /// Keyword relevance filter is running
    Filtering,

    /// Text is being partitioned under the token budget
    Chunking,

    /// Chunk `chunk` of `total` is being submitted (1-based)
    Extracting {
        /// Current chunk (1-based, in processing order)
        chunk: usize,
        /// Total number of chunks
        total: usize,
    },

    /// Per-chunk results are being merged
    Deduplicating,

    /// Job finished (successfully or with partial results)
    Complete,
}

impl JobStage {
    /// Position of the stage in the lifecycle, used to reject backwards moves
    fn ordinal(&self) -> (u8, usize) {
        match self {
            JobStage::Received => (0, 0),
            JobStage::Normalizing => (1, 0),
            JobStage::Filtering => (2, 0),
            JobStage::Chunking => (3, 0),
            JobStage::Extracting { chunk, .. } => (4, *chunk),
            JobStage::Deduplicating => (5, 0),
            JobStage::Complete => (6, 0),
        }
    }

    /// Whether moving from `self` to `next` keeps the lifecycle monotonic
    ///
    /// # Examples
    ///
    /// ```
    /// use packwise_domain::JobStage;
    ///
    /// assert!(JobStage::Received.can_advance_to(JobStage::Normalizing));
    /// assert!(!JobStage::Complete.can_advance_to(JobStage::Chunking));
    /// ```
    pub fn can_advance_to(&self, next: JobStage) -> bool {
        next.ordinal() > self.ordinal()
    }

    /// Whether this is the terminal stage
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStage::Complete)
    }

    /// Short lowercase label for logs
    pub fn label(&self) -> &'static str {
        match self {
            JobStage::Received => "received",
            JobStage::Normalizing => "normalizing",
            JobStage::Filtering => "filtering",
            JobStage::Chunking => "chunking",
            JobStage::Extracting { .. } => "extracting",
            JobStage::Deduplicating => "deduplicating",
            JobStage::Complete => "complete",
        }
    }
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStage::Extracting { chunk, total } => {
                write!(f, "extracting({}/{})", chunk, total)
            }
            other => f.write_str(other.label()),
        }
    }
}
