//! Arena constants

/// Granularity of arena allocations in bytes.
pub const PAGE_SIZE: usize = 4096;

/// Maximum number of outstanding allocations.
pub const MAX_ALLOCATIONS: usize = 1024;
