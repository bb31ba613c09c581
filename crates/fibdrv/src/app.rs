//! Application entry point and sweep modes.

use std::io::{BufWriter, Write};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::Serialize;

use fibdrv_core::calculator::{Calculator, FibCalculator, FibError};
use fibdrv_core::constants::MAX_LENGTH;
use fibdrv_core::device::{FibDevice, FibSession, Whence};
use fibdrv_core::fastdoubling::FastDoubling;
use fibdrv_core::iterative::IterativeAddition;
use fibdrv_core::memory_budget::{parse_memory_limit, MemoryEstimate};
use fibdrv_core::options::Options;

use crate::config::{Algo, AppConfig, Mode};

/// One row of a timing sweep.
#[derive(Debug, Serialize)]
pub struct TimeRow {
    /// Offset read.
    pub k: u64,
    /// Wall time of the read as seen by the caller.
    pub user_ns: u64,
    /// Computation time reported by the device.
    pub kernel_ns: u64,
    /// Difference of the two.
    pub overhead_ns: u64,
}

/// One row of a value sweep.
#[derive(Debug, Serialize)]
pub struct ValueRow {
    /// Offset read.
    pub k: u64,
    /// F(k) in decimal.
    pub value: String,
}

/// Outcome of a verification sweep.
#[derive(Debug, Serialize)]
pub struct VerifySummary {
    /// Offsets checked.
    pub checked: u64,
    /// Whether every value matched.
    pub passed: bool,
}

/// Build the device's options from the command line.
pub fn build_options(config: &AppConfig) -> Result<Options, FibError> {
    let memory_limit = parse_memory_limit(&config.memory_limit).map_err(FibError::Config)?;
    Ok(Options {
        parallel_threshold: config.parallel_threshold,
        memory_limit,
    }
    .normalize())
}

fn make_calculator(algo: Algo) -> Arc<dyn Calculator> {
    match algo {
        Algo::FastDoubling => Arc::new(FibCalculator::new(Arc::new(FastDoubling::new()))),
        Algo::Iterative => Arc::new(FibCalculator::new(Arc::new(IterativeAddition::new()))),
    }
}

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    if config.max_k > MAX_LENGTH {
        return Err(FibError::Config(format!(
            "max-k {} exceeds the device limit {MAX_LENGTH}",
            config.max_k
        ))
        .into());
    }
    let opts = build_options(config)?;

    // Memory budget check
    let estimate = MemoryEstimate::estimate(config.max_k);
    if opts.memory_limit > 0 && !estimate.fits_in(Some(opts.memory_limit)) {
        tracing::warn!(
            estimate = estimate.total_bytes,
            limit = opts.memory_limit,
            "estimated memory exceeds limit; large offsets may fail"
        );
    }

    let device = FibDevice::new(make_calculator(config.algo), opts);
    let mut session = device.open()?;
    tracing::info!(
        max_k = config.max_k,
        mode = ?config.mode,
        calculator = device.calculator_name(),
        "sweep started"
    );

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match config.mode {
        Mode::Time => {
            let words = estimate.result_bytes / std::mem::size_of::<u64>() + 1;
            sweep_time(&mut session, config, words, &mut out)?;
        }
        Mode::Value => sweep_values(&mut session, config, &mut out)?,
        Mode::Verify => verify(&mut session, config, &mut out)?,
    }
    out.flush().context("failed to flush output")?;

    let stats = device.allocator_stats();
    tracing::info!(
        allocations = stats.allocations,
        peak_words = stats.peak_words,
        "sweep finished"
    );
    Ok(())
}

#[allow(clippy::cast_possible_wrap)]
fn seek_to(session: &mut FibSession<'_>, k: u64) {
    // k <= MAX_LENGTH, far below i64::MAX.
    session.seek(k as i64, Whence::Set);
}

fn sweep_time(
    session: &mut FibSession<'_>,
    config: &AppConfig,
    words: usize,
    out: &mut impl Write,
) -> Result<()> {
    let mut buf = vec![0u64; words];
    for k in 0..=config.max_k {
        seek_to(session, k);
        let start = Instant::now();
        session.read(&mut buf)?;
        let user_ns = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
        let kernel_ns = session.write();
        let row = TimeRow {
            k,
            user_ns,
            kernel_ns,
            overhead_ns: user_ns.saturating_sub(kernel_ns),
        };
        if config.json {
            writeln!(out, "{}", serde_json::to_string(&row)?)?;
        } else {
            writeln!(
                out,
                "{} {} {} {}",
                row.k, row.user_ns, row.kernel_ns, row.overhead_ns
            )?;
        }
    }
    Ok(())
}

fn sweep_values(
    session: &mut FibSession<'_>,
    config: &AppConfig,
    out: &mut impl Write,
) -> Result<()> {
    for k in 0..=config.max_k {
        seek_to(session, k);
        let value = session.read_value()?;
        let row = ValueRow {
            k,
            value: value.to_dec_string().map_err(FibError::from)?,
        };
        if config.json {
            writeln!(out, "{}", serde_json::to_string(&row)?)?;
        } else {
            writeln!(out, "{} {}", row.k, row.value)?;
        }
    }
    Ok(())
}

fn verify(session: &mut FibSession<'_>, config: &AppConfig, out: &mut impl Write) -> Result<()> {
    // (a, b) = (F(k), F(k + 1)) by plain addition.
    let (mut a, mut b) = (BigUint::zero(), BigUint::one());
    for k in 0..=config.max_k {
        seek_to(session, k);
        let value = session.read_value()?;
        if value.is_negative() || value.to_biguint() != a {
            tracing::warn!(k, "value mismatch");
            return Err(FibError::Mismatch { k }.into());
        }
        let next = &a + &b;
        a = std::mem::replace(&mut b, next);
    }

    let summary = VerifySummary {
        checked: config.max_k + 1,
        passed: true,
    };
    if config.json {
        writeln!(out, "{}", serde_json::to_string(&summary)?)?;
    } else {
        writeln!(out, "Passed")?;
    }
    Ok(())
}
