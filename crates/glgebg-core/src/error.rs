//! Error types for the GLGE background library

use core::fmt;

/// Result type for library operations
pub type BgResult<T> = Result<T, BgError>;

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur across the library
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BgError {
    /// Byte buffer allocation or contract error
    Buffer(BufferError),

    /// String position error
    String(StringError),

    /// Thread handle error
    Thread(ThreadError),

    /// System information query failed
    SysInfo(SysInfoError),

    /// Configuration rejected by validation
    InvalidConfig(&'static str),
}

impl fmt::Display for BgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BgError::Buffer(e) => write!(f, "buffer error: {}", e),
            BgError::String(e) => write!(f, "string error: {}", e),
            BgError::Thread(e) => write!(f, "thread error: {}", e),
            BgError::SysInfo(e) => write!(f, "system info error: {}", e),
            BgError::InvalidConfig(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for BgError {}

/// Byte buffer errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The allocator refused a request of this many bytes
    AllocationFailed { bytes: usize },

    /// `elements * element_size` does not fit in `usize`
    CapacityOverflow,

    /// Element size of zero was requested
    ZeroElementSize,

    /// Input bytes are not exactly one element (or a whole number of elements)
    ElementSizeMismatch { expected: usize, found: usize },

    /// Element index (or range end) past the logical size
    OutOfBounds { index: usize, len: usize },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::AllocationFailed { bytes } => {
                write!(f, "failed to allocate {} bytes", bytes)
            }
            BufferError::CapacityOverflow => write!(f, "capacity overflow"),
            BufferError::ZeroElementSize => write!(f, "element size must be non-zero"),
            BufferError::ElementSizeMismatch { expected, found } => {
                write!(f, "element is {} bytes, got {}", expected, found)
            }
            BufferError::OutOfBounds { index, len } => {
                write!(f, "index {} out of bounds for {} elements", index, len)
            }
        }
    }
}

impl std::error::Error for BufferError {}

impl From<BufferError> for BgError {
    fn from(e: BufferError) -> Self {
        BgError::Buffer(e)
    }
}

/// String errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringError {
    /// Position past the end of the string
    OutOfRange { pos: usize, len: usize },

    /// Operation needs at least one byte
    Empty,

    /// Resulting length would exceed `max_size()` or cannot be allocated
    TooLong { requested: usize, max: usize },
}

impl fmt::Display for StringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringError::OutOfRange { pos, len } => {
                write!(f, "position {} out of range for length {}", pos, len)
            }
            StringError::Empty => write!(f, "string is empty"),
            StringError::TooLong { requested, max } => {
                write!(f, "length {} exceeds maximum {}", requested, max)
            }
        }
    }
}

impl std::error::Error for StringError {}

impl From<StringError> for BgError {
    fn from(e: StringError) -> Self {
        BgError::String(e)
    }
}

/// Thread handle errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadError {
    /// The OS refused to create the thread
    SpawnFailed,

    /// Already joined or detached
    NotJoinable,

    /// The thread body panicked
    Panicked,
}

impl fmt::Display for ThreadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadError::SpawnFailed => write!(f, "failed to spawn thread"),
            ThreadError::NotJoinable => write!(f, "thread is not joinable"),
            ThreadError::Panicked => write!(f, "thread panicked"),
        }
    }
}

impl std::error::Error for ThreadError {}

impl From<ThreadError> for BgError {
    fn from(e: ThreadError) -> Self {
        BgError::Thread(e)
    }
}

/// System information errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SysInfoError {
    /// A proc file could not be read
    Unreadable { path: String, reason: String },

    /// The file was read but the named field was missing or malformed
    MissingField { path: String, field: String },

    /// An OS query call failed
    Os { call: String, code: i32 },

    /// No backend for this platform
    Unsupported,
}

impl fmt::Display for SysInfoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SysInfoError::Unreadable { path, reason } => {
                write!(f, "failed to read {}: {}", path, reason)
            }
            SysInfoError::MissingField { path, field } => {
                write!(f, "field {} not found in {}", field, path)
            }
            SysInfoError::Os { call, code } => write!(f, "{} failed with OS error {}", call, code),
            SysInfoError::Unsupported => write!(f, "not supported on this platform"),
        }
    }
}

impl std::error::Error for SysInfoError {}

impl From<SysInfoError> for BgError {
    fn from(e: SysInfoError) -> Self {
        BgError::SysInfo(e)
    }
}
