use anyhow::{Context, Result};
use clap::Parser;
use dyn_array_list::benchmark::{
    self,
    BenchConfig,
    DEFAULT_RANDOM_OPS,
    DEFAULT_SEED,
    DEFAULT_SIZES,
};
use tracing_subscriber::EnvFilter;

/// Times appends and random reads on ArrayList and Vec and prints a table.
#[derive(Parser, Debug)]
#[command(name = "bench_table", version)]
struct Cli {
    /// Element counts to measure, comma separated.
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_SIZES)]
    sizes: Vec<usize>,

    /// Random reads per size.
    #[arg(long, default_value_t = DEFAULT_RANDOM_OPS)]
    random_ops: usize,

    /// Seed for the index generator.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = BenchConfig {
        sizes: cli.sizes,
        random_ops: cli.random_ops,
        seed: cli.seed,
    };

    let rows = benchmark::run(&config).context("benchmark run failed")?;
    print!("{}", benchmark::render_table(&rows));
    Ok(())
}
