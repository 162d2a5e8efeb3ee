//! Timing harness comparing [`ArrayList`] with [`Vec`].
//!
//! For each size `n` a fresh sequence receives `n` appends (timed), then a
//! second sequence is filled untimed and read at `random_ops` indices drawn
//! from a seeded generator (timed).

use std::{
    hint::black_box,
    time::{
        Duration,
        Instant,
    },
};

use rand::{
    rngs::StdRng,
    Rng,
    SeedableRng,
};
use tracing::info;

use crate::{
    errors::Error,
    ArrayList,
};

pub const DEFAULT_SIZES: [usize; 4] = [100_000, 250_000, 500_000, 1_000_000];
pub const DEFAULT_RANDOM_OPS: usize = 100_000;
pub const DEFAULT_SEED: u64 = 42;

const COLUMN_WIDTH: usize = 12;

/// A growable sequence of `usize` that can be measured.
pub trait SequenceUnderTest: Sized {
    const LABEL: &'static str;

    fn create() -> Result<Self, Error>;

    fn push_value(&mut self, value:usize) -> Result<(), Error>;

    fn read(&self, index:usize) -> Result<usize, Error>;
}

impl SequenceUnderTest for ArrayList<usize> {
    const LABEL: &'static str = "ArrayList";

    fn create() -> Result<Self, Error> {
        ArrayList::new()
    }

    fn push_value(&mut self, value:usize) -> Result<(), Error> {
        self.append(value)
    }

    fn read(&self, index:usize) -> Result<usize, Error> {
        self.get(index).copied()
    }
}

impl SequenceUnderTest for Vec<usize> {
    const LABEL: &'static str = "Vec";

    fn create() -> Result<Self, Error> {
        Ok(Vec::new())
    }

    fn push_value(&mut self, value:usize) -> Result<(), Error> {
        self.push(value);
        Ok(())
    }

    fn read(&self, index:usize) -> Result<usize, Error> {
        self.as_slice().get(index).copied().ok_or(Error::IndexOutOfRange{
            index,
            size: self.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig{
    pub sizes: Vec<usize>,
    pub random_ops: usize,
    pub seed: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self{
            sizes: DEFAULT_SIZES.to_vec(),
            random_ops: DEFAULT_RANDOM_OPS,
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchRow{
    pub n: usize,
    pub label: &'static str,
    pub append: Duration,
    pub random_get: Duration,
}

fn filled<S: SequenceUnderTest>(n:usize) -> Result<S, Error> {
    let mut sequence = S::create()?;
    for value in 0..n {
        sequence.push_value(value)?;
    }
    Ok(sequence)
}

pub fn measure_append<S: SequenceUnderTest>(n:usize) -> Result<Duration, Error> {
    let mut sequence = S::create()?;
    let started = Instant::now();
    for value in 0..n {
        sequence.push_value(value)?;
    }
    let elapsed = started.elapsed();
    black_box(&sequence);
    Ok(elapsed)
}

/// Times `ops` reads at uniformly drawn indices of an `n`-element sequence.
/// An empty sequence has nothing to read and reports zero.
pub fn measure_random_get<S: SequenceUnderTest>(n:usize, ops:usize, seed:u64) -> Result<Duration, Error> {
    let sequence = filled::<S>(n)?;
    if n == 0 {
        return Ok(Duration::ZERO);
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let started = Instant::now();
    for _ in 0..ops {
        black_box(sequence.read(rng.gen_range(0..n))?);
    }
    Ok(started.elapsed())
}

fn bench_row<S: SequenceUnderTest>(n:usize, config:&BenchConfig) -> Result<BenchRow, Error> {
    let row = BenchRow{
        n,
        label: S::LABEL,
        append: measure_append::<S>(n)?,
        random_get: measure_random_get::<S>(n, config.random_ops, config.seed)?,
    };
    info!(
        n,
        implementation = row.label,
        append_ms = row.append.as_millis() as u64,
        random_get_ms = row.random_get.as_millis() as u64,
        "measured"
    );
    Ok(row)
}

/// Measures both implementations for every configured size, the list first.
pub fn run(config:&BenchConfig) -> Result<Vec<BenchRow>, Error> {
    let mut rows = Vec::with_capacity(config.sizes.len() * 2);
    for &n in &config.sizes {
        rows.push(bench_row::<ArrayList<usize>>(n, config)?);
        rows.push(bench_row::<Vec<usize>>(n, config)?);
    }
    Ok(rows)
}

pub fn render_table(rows:&[BenchRow]) -> String {
    let mut table = format_line("N", "Impl", "Append(ms)", "RandomGet(ms)");
    for row in rows {
        table.push_str(&format_line(
            row.n,
            row.label,
            row.append.as_millis(),
            row.random_get.as_millis(),
        ));
    }
    table
}

fn format_line(
    n:impl std::fmt::Display,
    label:impl std::fmt::Display,
    append:impl std::fmt::Display,
    random_get:impl std::fmt::Display,
) -> String {
    format!(
        "{:<w$} {:<w$} {:<w$} {:<w$}\n",
        n.to_string(),
        label.to_string(),
        append.to_string(),
        random_get.to_string(),
        w = COLUMN_WIDTH,
    )
}
