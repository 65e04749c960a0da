//! tinypool CLI: drive the pools from a handful of worker threads.

use clap::{Parser, Subcommand};
use rand::Rng;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tinypool_core::config::{parse_bucket_list, PoolConfig};
use tinypool_mem::{ObjectPool, SegmentedPool};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "tinypool")]
#[command(about = "Exercise the tinypool object and buffer pools", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Share one pool of expensive objects between worker threads
    Object {
        /// Number of worker threads
        #[arg(long, default_value_t = 3)]
        workers: usize,

        /// Leases taken by each worker
        #[arg(long, default_value_t = 5)]
        iterations: usize,
    },

    /// Request random buffer sizes from a segmented pool
    Memory {
        /// Path to a JSON pool layout (overrides env/defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Inline bucket list, e.g. `700,1400:2,2000:2` (overrides --config)
        #[arg(long)]
        buckets: Option<String>,

        /// Number of worker threads
        #[arg(long, default_value_t = 3)]
        workers: usize,

        /// Buffers requested by each worker
        #[arg(long, default_value_t = 5)]
        iterations: usize,
    },

    /// Keep using an object after its lease was released (wrong usage)
    Misuse {
        /// Number of worker threads
        #[arg(long, default_value_t = 3)]
        workers: usize,

        /// Leases taken by each worker
        #[arg(long, default_value_t = 5)]
        iterations: usize,
    },

    /// Print the effective pool layout as JSON
    Layout {
        /// Path to a JSON pool layout (overrides env/defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli.log_level) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Object {
            workers,
            iterations,
        } => run_object_sample(workers, iterations),
        Commands::Memory {
            config,
            buckets,
            workers,
            iterations,
        } => run_memory_sample(config, buckets, workers, iterations),
        Commands::Misuse {
            workers,
            iterations,
        } => run_misuse_sample(workers, iterations),
        Commands::Layout { config } => print_layout(config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let level = match log_level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_names(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Something worth pooling: slow to build, cheap to use.
struct ExpensiveObject {
    instance: usize,
    busy: AtomicBool,
}

static INSTANCES: AtomicUsize = AtomicUsize::new(0);

impl ExpensiveObject {
    fn new() -> Self {
        thread::sleep(Duration::from_millis(200));
        Self {
            instance: INSTANCES.fetch_add(1, Ordering::SeqCst),
            busy: AtomicBool::new(false),
        }
    }

    /// Returns false if another worker was using this instance at the same time.
    fn do_some_work(&self, worker: usize) -> bool {
        let exclusive = !self.busy.swap(true, Ordering::AcqRel);
        info!(instance = self.instance, worker, "doing work");
        thread::sleep(Duration::from_millis(20));
        if exclusive {
            self.busy.store(false, Ordering::Release);
        }
        exclusive
    }
}

fn run_object_sample(workers: usize, iterations: usize) -> Result<(), Box<dyn std::error::Error>> {
    info!(workers, iterations, "starting object pool sample");
    let pool = ObjectPool::new(ExpensiveObject::new);

    thread::scope(|s| -> Result<(), tinypool_mem::Error> {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let pool = pool.clone();
                s.spawn(move || -> Result<(), tinypool_mem::Error> {
                    for _ in 0..iterations {
                        let lease = pool.get_object();
                        lease.value()?.do_some_work(worker);
                        // lease drops here and the object goes back to the pool
                    }
                    Ok(())
                })
            })
            .collect();

        for handle in handles {
            handle
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic))?;
        }
        Ok(())
    })?;

    println!("{}", serde_json::to_string_pretty(&pool.stats())?);
    Ok(())
}

fn load_config(
    config: Option<PathBuf>,
    buckets: Option<String>,
) -> Result<PoolConfig, Box<dyn std::error::Error>> {
    if let Some(list) = buckets {
        return Ok(PoolConfig {
            buckets: parse_bucket_list(&list)?,
        });
    }
    match config {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            Ok(PoolConfig::from_json(&json)?)
        }
        None => Ok(PoolConfig::from_env()),
    }
}

fn run_memory_sample(
    config: Option<PathBuf>,
    buckets: Option<String>,
    workers: usize,
    iterations: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = load_config(config, buckets)?;
    let pool: SegmentedPool<i64> = SegmentedPool::from_config(&cfg)?;
    info!(
        workers,
        iterations,
        max_size = pool.max_size(),
        "starting memory pool sample"
    );

    thread::scope(|s| -> Result<(), tinypool_mem::Error> {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let pool = &pool;
                s.spawn(move || -> Result<(), tinypool_mem::Error> {
                    let mut rng = rand::thread_rng();
                    for _ in 0..iterations {
                        let requested = rng.gen_range(1..=pool.max_size());
                        // The buffer may be longer than requested: it has the
                        // length of the bucket that served it.
                        let mut lease = pool.get_buffer(requested)?;
                        let buffer = lease.value_mut()?;
                        buffer[..requested].fill(worker as i64);
                        thread::sleep(Duration::from_millis(20));
                        info!(worker, requested, received = buffer.len(), "buffer used");
                    }
                    Ok(())
                })
            })
            .collect();

        for handle in handles {
            handle
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic))?;
        }
        Ok(())
    })?;

    let report: Vec<_> = pool
        .buckets()
        .iter()
        .map(|bucket| {
            json!({
                "size": bucket.size(),
                "stored": bucket.stored_count(),
                "stats": bucket.stats(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_misuse_sample(workers: usize, iterations: usize) -> Result<(), Box<dyn std::error::Error>> {
    info!(workers, iterations, "starting wrong pool usage sample");
    let pool = ObjectPool::new(|| Arc::new(ExpensiveObject::new()));
    let collisions = AtomicUsize::new(0);

    thread::scope(|s| -> Result<(), tinypool_mem::Error> {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let pool = pool.clone();
                let collisions = &collisions;
                s.spawn(move || -> Result<(), tinypool_mem::Error> {
                    for _ in 0..iterations {
                        let lease = pool.get_object();
                        let retained = Arc::clone(lease.value()?);
                        drop(lease);
                        // Wrong: the object is back in the pool and may already
                        // be leased to another worker.
                        if !retained.do_some_work(worker) {
                            collisions.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                    Ok(())
                })
            })
            .collect();

        for handle in handles {
            handle
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic))?;
        }
        Ok(())
    })?;

    let collisions = collisions.load(Ordering::Relaxed);
    if collisions > 0 {
        warn!(collisions, "workers shared an instance after release");
    }
    println!("{}", serde_json::to_string_pretty(&pool.stats())?);
    Ok(())
}

fn print_layout(config: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = load_config(config, None)?;
    // Validate before printing so a bad layout is reported here too.
    SegmentedPool::<u8>::from_config(&cfg)?;
    println!("{}", cfg.to_json()?);
    Ok(())
}
