//! Chunk planning for multipart uploads
//!
//! Splits a byte length into a bounded number of provider-legal part
//! sizes. Planning is deterministic and total over `u64` lengths; the
//! provider limits carry the tuning knobs.

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

/// Provider limits governing part sizing
///
/// `magnitude_base` controls how aggressively the part size grows with
/// the stream length and must be at least 1.
#[derive(Debug, Clone)]
pub struct PartLimits {
    pub min_part: u64,
    pub max_part: u64,
    pub max_parts: u64,
    pub default_part: u64,
    pub magnitude_base: u64,
}

impl PartLimits {
    /// Blob store defaults: 32 MiB parts scaled per 100 parts of
    /// magnitude, 5 MiB floor, 5 GiB ceiling, 10 000 part ceiling.
    pub const fn default_limits() -> Self {
        Self {
            min_part: 5 * MIB,
            max_part: 5 * GIB,
            max_parts: 10_000,
            default_part: 32 * MIB,
            magnitude_base: 100,
        }
    }
}

impl Default for PartLimits {
    fn default() -> Self {
        Self::default_limits()
    }
}

/// Immutable partitioning of a byte length into upload parts
///
/// `part_count - 1` parts of `part_size` bytes followed by one final
/// part of `remainder_size` bytes, so that
/// `part_size * (part_count - 1) + remainder_size == length` over the
/// normal operating range. An exact multiple of `part_size` yields a
/// full-sized final part rather than an empty trailing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    pub part_size: u64,
    pub part_count: u64,
    pub remainder_size: u64,
}

impl ChunkPlan {
    /// Compute the partitioning of `length` bytes under `limits`.
    ///
    /// The part size starts at `default_part` and is scaled up by whole
    /// magnitudes (`parts / magnitude_base`) for long streams, clamped
    /// to `max_part`. Lengths that would still exceed `max_parts` after
    /// falling back to `min_part` units are clamped to `max_parts - 1`
    /// parts, deliberately under-covering the stream instead of
    /// erroring: inputs past the provider ceiling are outside the
    /// supported operating range and the caller gets a plan that stays
    /// within provider limits.
    pub fn compute(length: u64, limits: &PartLimits) -> ChunkPlan {
        let mut unit_part_size = limits.default_part;
        let mut part_size = unit_part_size;
        let mut parts = length / part_size;

        let magnitude = parts / limits.magnitude_base;
        if magnitude > 0 {
            part_size = magnitude * unit_part_size;
            if part_size > limits.max_part {
                part_size = limits.max_part;
                unit_part_size = limits.max_part;
            }
            parts = length / part_size;
            // A dropped remainder means the plan would silently lose
            // bytes; one more magnitude step absorbs it.
            if parts * part_size < length {
                part_size = (magnitude + 1) * unit_part_size;
                if part_size > limits.max_part {
                    part_size = limits.max_part;
                    unit_part_size = limits.max_part;
                }
                parts = length / part_size;
            }
        }

        if parts > limits.max_parts {
            unit_part_size = limits.min_part;
            parts = length / unit_part_size;
        }
        if parts > limits.max_parts {
            // Lossy fallback, kept on purpose.
            parts = limits.max_parts - 1;
        }

        let remainder = length % unit_part_size;
        if remainder == 0 && parts > 0 {
            parts -= 1;
        }

        ChunkPlan {
            part_size,
            part_count: parts + 1,
            remainder_size: length - part_size * parts,
        }
    }

    /// Total bytes covered by the plan
    pub fn covered_length(&self) -> u64 {
        self.part_size * (self.part_count - 1) + self.remainder_size
    }

    /// Byte offset range of a 1-based part
    pub fn byte_range(&self, part_number: u64) -> std::ops::Range<u64> {
        debug_assert!(part_number >= 1 && part_number <= self.part_count);
        let start = (part_number - 1) * self.part_size;
        let size = if part_number == self.part_count {
            self.remainder_size
        } else {
            self.part_size
        };
        start..start + size
    }
}
