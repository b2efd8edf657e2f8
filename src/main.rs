use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use zobench::{save_results, BenchConfig, Benchmark};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the benchmark
    Run {
        /// JSON configuration file, default grid when absent
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, default_value = "zobench_results.json")]
        output: PathBuf,
        #[arg(short = 'j', long)]
        n_jobs: Option<usize>,
        #[arg(long)]
        max_runs: Option<usize>,
        /// Timeout of each budget escalation in seconds
        #[arg(long)]
        timeout: Option<f64>,
        /// Only run datasets whose name contains this pattern
        #[arg(short, long)]
        dataset: Option<String>,
        /// Only run solvers whose name contains this pattern
        #[arg(short, long)]
        solver: Option<String>,
    },
    /// Print the default configuration
    Config,
    /// List the datasets and solvers of a configuration
    List {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn read_config(path: Option<PathBuf>) -> anyhow::Result<BenchConfig> {
    match path {
        Some(path) => BenchConfig::from_file(&path)
            .with_context(|| format!("cannot read configuration {}", path.display())),
        None => Ok(BenchConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    zobench_core::init_logger();
    let args = Args::parse();

    match args.command {
        Command::Run {
            config,
            output,
            n_jobs,
            max_runs,
            timeout,
            dataset,
            solver,
        } => {
            let mut config = read_config(config)?;
            if let Some(n_jobs) = n_jobs {
                config = config.n_jobs(n_jobs);
            }
            if let Some(max_runs) = max_runs {
                config = config.max_runs(max_runs);
            }
            if timeout.is_some() {
                config = config.timeout(timeout);
            }
            if let Some(pattern) = dataset {
                config = config.dataset_filter(&pattern);
            }
            if let Some(pattern) = solver {
                config = config.solver_filter(&pattern);
            }
            let results = Benchmark::new(config.check()?).run()?;
            save_results(&output, &results)
                .with_context(|| format!("cannot write results {}", output.display()))?;
            info!("Results saved in {}", output.display());
            for best in results.best_per_combination() {
                println!(
                    "{:<45} {:<40} {:>14.6e}",
                    best.solver_name, best.data_name, best.objective_value
                );
            }
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&BenchConfig::default())?);
        }
        Command::List { config } => {
            let benchmark = Benchmark::new(read_config(config)?.check()?);
            let (datasets, solvers) = benchmark.selection()?;
            println!("Datasets:");
            for (_, name) in datasets {
                println!("  {name}");
            }
            println!("Solvers:");
            for (_, name) in solvers {
                println!("  {name}");
            }
        }
    }
    Ok(())
}
