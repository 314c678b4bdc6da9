use aws_config::BehaviorVersion;
use aws_sdk_lambda::Client;
use clap::Parser;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

const NAMES: &[&str] = &[
    "Alice", "Bob", "Carol", "Dave", "Erin", "Frank", "Grace", "Heidi", "Ivan", "Judy",
];

#[derive(Default)]
struct Stats {
    success_count: usize,
    error_count: usize,
    mismatch_count: usize,
    total_latency_ms: f64,
    error_latency_ms: f64,
}

impl Stats {
    fn record_success(&mut self, latency_ms: f64, mismatch: bool) {
        self.success_count += 1;
        self.total_latency_ms += latency_ms;
        if mismatch {
            self.mismatch_count += 1;
        }
    }

    fn record_error(&mut self, latency_ms: f64) {
        self.error_count += 1;
        self.error_latency_ms += latency_ms;
    }
}

#[derive(Deserialize)]
struct SuccessResponse {
    greeting: String,
}

#[derive(Debug, PartialEq)]
enum Outcome {
    Greeting(String),
    Error,
    Unrecognized,
}

#[derive(Parser, Debug)]
#[command(name = "invoke-test")]
#[command(about = "Invoke the greeter Lambda function with random names")]
struct Args {
    /// Lambda function name
    function: String,

    /// Number of iterations to run
    #[arg(long, default_value = "1000")]
    iters: usize,

    /// Number of parallel threads
    #[arg(long, default_value = "1")]
    threads: usize,

    /// Fraction of invocations sent with an empty name
    #[arg(long, default_value = "0.0")]
    empty_ratio: f64,
}

impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.threads > 0, "--threads must be at least 1");
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.empty_ratio),
            "--empty-ratio must be between 0 and 1, got {}",
            self.empty_ratio
        );
        Ok(())
    }
}

/// A greeting that differs from what the library would produce locally.
/// An empty name that came back with a greeting is also a mismatch.
fn is_mismatch(name: &str, greeting: &str) -> bool {
    greetings::hello(name).ok().as_deref() != Some(greeting)
}

fn classify(payload: &str) -> Outcome {
    if let Ok(success) = serde_json::from_str::<SuccessResponse>(payload) {
        Outcome::Greeting(success.greeting)
    } else if payload.contains("errorType") || payload.contains("errorMessage") {
        Outcome::Error
    } else {
        Outcome::Unrecognized
    }
}

/// Inclusive 1-based iteration ranges, one per thread. The last thread
/// takes the remainder.
fn split_iters(iters: usize, threads: usize) -> Vec<(usize, usize)> {
    let iters_per_thread = iters / threads;
    let remainder = iters % threads;

    let mut ranges = Vec::with_capacity(threads);
    let mut start = 1;
    for t in 1..=threads {
        let end = if t == threads {
            start + iters_per_thread - 1 + remainder
        } else {
            start + iters_per_thread - 1
        };
        ranges.push((start, end));
        start = end + 1;
    }
    ranges
}

async fn run_invocations(
    client: Arc<Client>,
    function_name: String,
    thread_id: usize,
    (start, end): (usize, usize),
    total: usize,
    empty_ratio: f64,
    stats: Arc<Mutex<Stats>>,
) {
    let mut rng = StdRng::from_entropy();

    for i in start..=end {
        let name = if rng.gen_bool(empty_ratio) {
            ""
        } else {
            NAMES.choose(&mut rng).copied().unwrap_or("Alice")
        };

        let payload = serde_json::json!({ "name": name });

        let started = Instant::now();
        let result = client
            .invoke()
            .function_name(&function_name)
            .payload(aws_sdk_lambda::primitives::Blob::new(
                serde_json::to_vec(&payload).unwrap_or_default(),
            ))
            .send()
            .await;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        match result {
            Ok(response) => {
                let response_payload = response
                    .payload()
                    .map(|b| String::from_utf8_lossy(b.as_ref()).to_string())
                    .unwrap_or_else(|| "No response".to_string());

                {
                    let mut stats = stats.lock().await;
                    match classify(&response_payload) {
                        Outcome::Greeting(greeting) => {
                            stats.record_success(latency_ms, is_mismatch(name, &greeting));
                        }
                        Outcome::Error | Outcome::Unrecognized => stats.record_error(latency_ms),
                    }
                }

                println!(
                    "[Thread {}: {}/{}] Greeting {:?} => {}",
                    thread_id, i, total, name, response_payload
                );
            }
            Err(e) => {
                {
                    let mut stats = stats.lock().await;
                    stats.record_error(latency_ms);
                }

                eprintln!(
                    "[Thread {}: {}/{}] Error greeting {:?}: {}",
                    thread_id, i, total, name, e
                );
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    args.validate()?;

    println!(
        "Running {} invocations across {} thread(s)",
        args.iters, args.threads
    );

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let client = Arc::new(Client::new(&config));

    let stats = Arc::new(Mutex::new(Stats::default()));

    let mut tasks = JoinSet::new();

    for (t, range) in split_iters(args.iters, args.threads).into_iter().enumerate() {
        let client = Arc::clone(&client);
        let function_name = args.function.clone();
        let stats = Arc::clone(&stats);
        let total = args.iters;
        let empty_ratio = args.empty_ratio;

        tasks.spawn(async move {
            run_invocations(
                client,
                function_name,
                t + 1,
                range,
                total,
                empty_ratio,
                stats,
            )
            .await;
        });
    }

    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            eprintln!("Task failed: {}", e);
        }
    }

    let stats = stats.lock().await;
    println!("Completed {} invocations", args.iters);
    println!();
    println!("Results:");
    println!("  Success:    {}", stats.success_count);
    println!("  Errors:     {}", stats.error_count);
    println!("  Mismatches: {}", stats.mismatch_count);
    if stats.success_count > 0 {
        let avg_latency = stats.total_latency_ms / stats.success_count as f64;
        println!("  Avg success latency: {:.3}ms", avg_latency);
    }
    if stats.error_count > 0 {
        let avg_latency = stats.error_latency_ms / stats.error_count as f64;
        println!("  Avg error latency:   {:.3}ms", avg_latency);
    }

    Ok(())
}
