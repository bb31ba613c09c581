//! Application configuration from CLI flags and environment.

use clap::{Parser, ValueEnum};

/// fibdrv: sweep the Fibonacci device, print values, or verify them.
#[derive(Parser, Debug)]
#[command(name = "fibdrv", version)]
pub struct AppConfig {
    /// Largest offset to read; offsets 0..=k are swept.
    #[arg(short = 'k', long, default_value = "500", env = "FIBDRV_MAX_K")]
    pub max_k: u64,

    /// What to do at each offset.
    #[arg(long, value_enum, default_value_t = Mode::Time)]
    pub mode: Mode,

    /// Algorithm behind the device.
    #[arg(long, value_enum, default_value_t = Algo::FastDoubling)]
    pub algo: Algo,

    /// Operand size in words at which doubling steps run in parallel
    /// (0 = default).
    #[arg(long, default_value = "0")]
    pub parallel_threshold: usize,

    /// Memory limit for digit storage (e.g., "512M", "64K").
    #[arg(long, default_value = "")]
    pub memory_limit: String,

    /// Emit one JSON object per line instead of plain text.
    #[arg(long)]
    pub json: bool,
}

/// Sweep modes.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `k user_ns kernel_ns user_minus_kernel` per offset.
    Time,
    /// `k F(k)` in decimal per offset.
    Value,
    /// Check every F(k) against an independent reference.
    Verify,
}

/// Calculators the device can use.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algo {
    /// Fast doubling with Karatsuba products.
    FastDoubling,
    /// Repeated addition.
    Iterative,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::try_parse_from(["fibdrv"]).unwrap();
        assert_eq!(config.mode, Mode::Time);
        assert_eq!(config.algo, Algo::FastDoubling);
        assert!(!config.json);
    }

    #[test]
    fn kebab_case_values() {
        let config = AppConfig::try_parse_from([
            "fibdrv",
            "-k",
            "20",
            "--mode",
            "verify",
            "--algo",
            "iterative",
        ])
        .unwrap();
        assert_eq!(config.max_k, 20);
        assert_eq!(config.mode, Mode::Verify);
        assert_eq!(config.algo, Algo::Iterative);
        assert!(AppConfig::try_parse_from(["fibdrv", "--algo", "matrix"]).is_err());
    }
}
