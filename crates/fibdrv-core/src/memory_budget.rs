//! Memory budget estimation and validation.

use fibdrv_bignum::mul::mul_scratch_len;

const WORD_BYTES: usize = std::mem::size_of::<u64>();

/// Memory estimate for a Fibonacci computation.
#[derive(Debug, Clone)]
pub struct MemoryEstimate {
    /// Estimated memory for the result itself (in bytes).
    pub result_bytes: usize,
    /// Estimated memory for temporaries (in bytes).
    pub temp_bytes: usize,
    /// Total estimated memory (in bytes).
    pub total_bytes: usize,
}

impl MemoryEstimate {
    /// Estimate memory usage for computing F(n) by fast doubling.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn estimate(n: u64) -> Self {
        // F(n) has approximately n * log2(phi) bits, log2(phi) ≈ 0.6942
        let result_bits = (n as f64 * 0.6942).ceil() as usize;
        let result_words = result_bits.div_ceil(64) + 1;

        // a0, a1, a, tmp and the copy made by an in-place product.
        let mut temp_words = result_words * 5;

        // Karatsuba scratch for the last a1 * a, whose operands are about
        // half the result.
        let half = result_words / 2 + 1;
        temp_words += mul_scratch_len(half, half);

        let result_bytes = result_words * WORD_BYTES;
        let temp_bytes = temp_words * WORD_BYTES;
        Self {
            result_bytes,
            temp_bytes,
            total_bytes: result_bytes + temp_bytes,
        }
    }

    /// Check if the computation fits within the given memory limit.
    ///
    /// `None` means unlimited (always fits).
    #[must_use]
    pub fn fits_in(&self, limit: Option<usize>) -> bool {
        match limit {
            None => true,
            Some(l) => self.total_bytes <= l,
        }
    }
}

/// Parse a memory limit string (e.g., "8G", "512M", "1024K").
///
/// # Errors
///
/// Returns an error string if the format is invalid or the number cannot be parsed.
pub fn parse_memory_limit(s: &str) -> Result<usize, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0);
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('G') {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('M') {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('K') {
        (n, 1024)
    } else if let Some(n) = s.strip_suffix('B') {
        (n, 1)
    } else {
        (s, 1)
    };

    let value: usize = num_str
        .trim()
        .parse()
        .map_err(|e| format!("invalid memory limit: {e}"))?;
    value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("memory limit {s} is too large"))
}
