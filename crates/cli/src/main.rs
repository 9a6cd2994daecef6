use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cold_start::{ColdStartConfig, ColdStartModel, KnownPairPolicy};
use colored::Colorize;
use data_loader::{Dataset, MovieId, UserId, RATINGS_FILE, USERS_FILE};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

/// Cold-start rating predictions from demographic clusters
#[derive(Parser)]
#[command(name = "cold-start")]
#[command(about = "Fallback rating predictions for unseen users and movies", long_about = None)]
struct Cli {
    /// Directory holding the user and rating sources
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// User source file name inside the data directory
    #[arg(long, default_value = USERS_FILE)]
    users_file: String,

    /// Rating source file name (.json lines, or MovieLens .dat)
    #[arg(long, default_value = RATINGS_FILE)]
    ratings_file: String,

    /// JSON file with a full model configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of demographic clusters [default: 8]
    #[arg(short = 'k', long)]
    clusters: Option<usize>,

    /// Seed for k-means initialisation [default: 42]
    #[arg(long)]
    seed: Option<u64>,

    /// Aggregate used when both user and movie are known
    #[arg(long, value_enum)]
    known_pair: Option<KnownPairArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict a rating for a user and movie
    Predict {
        #[arg(long)]
        user_id: UserId,

        #[arg(long)]
        movie_id: MovieId,

        /// Show which aggregate produced the prediction
        #[arg(long)]
        explain: bool,
    },

    /// Show a user's demographics and cluster
    User {
        #[arg(long)]
        user_id: UserId,
    },

    /// Show size and average rating of every cluster
    Clusters,

    /// Time random predictions
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "1000")]
        requests: usize,

        /// Movie ids are drawn from 1..=max_movie_id
        #[arg(long, default_value = "3952")]
        max_movie_id: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KnownPairArg {
    /// Whole-cluster average, ignoring the movie
    ClusterWide,
    /// Cluster average for that movie only
    ClusterMovie,
}

impl From<KnownPairArg> for KnownPairPolicy {
    fn from(arg: KnownPairArg) -> Self {
        match arg {
            KnownPairArg::ClusterWide => KnownPairPolicy::ClusterWide,
            KnownPairArg::ClusterMovie => KnownPairPolicy::ClusterMovie,
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    println!("Loading sources from {}...", cli.data_dir.display());
    let start = Instant::now();
    let dataset = Dataset::load_from_files(
        &cli.data_dir.join(&cli.users_file),
        &cli.data_dir.join(&cli.ratings_file),
    )
    .context("Failed to load user and rating sources")?;

    let model = ColdStartModel::build(dataset, &config).context("Failed to build cold-start model")?;
    println!(
        "{} Built {} clusters in {:?}",
        "✓".green(),
        model.n_clusters(),
        start.elapsed()
    );

    match cli.command {
        Commands::Predict {
            user_id,
            movie_id,
            explain,
        } => handle_predict(&model, user_id, movie_id, explain)?,
        Commands::User { user_id } => handle_user(&model, user_id)?,
        Commands::Clusters => handle_clusters(&model),
        Commands::Benchmark {
            requests,
            max_movie_id,
        } => handle_benchmark(&model, requests, max_movie_id)?,
    }

    Ok(())
}

/// Start from the config file (or defaults), then apply explicit flags
fn resolve_config(cli: &Cli) -> Result<ColdStartConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_file(path)?,
        None => ColdStartConfig::default(),
    };

    if let Some(clusters) = cli.clusters {
        config.clustering.n_clusters = clusters;
    }
    if let Some(seed) = cli.seed {
        config.clustering.seed = seed;
    }
    if let Some(known_pair) = cli.known_pair {
        config.known_pair = known_pair.into();
    }

    info!(?config, "Resolved configuration");
    Ok(config)
}

fn load_config_file(path: &Path) -> Result<ColdStartConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Handle the 'predict' command
fn handle_predict(model: &ColdStartModel, user_id: UserId, movie_id: MovieId, explain: bool) -> Result<()> {
    let prediction = model
        .resolve(user_id, movie_id)
        .with_context(|| format!("No prediction for user {} and movie {}", user_id, movie_id))?;

    println!(
        "{} user {} / movie {}: {:.3}",
        "Predicted rating".bold().blue(),
        user_id,
        movie_id,
        prediction.rating
    );
    if explain {
        println!(
            "  {}{} over {} ratings",
            "• ".green(),
            prediction.aggregate,
            prediction.sample_count
        );
    }
    Ok(())
}

/// Handle the 'user' command
fn handle_user(model: &ColdStartModel, user_id: UserId) -> Result<()> {
    let clustered = model
        .get_user(user_id)
        .ok_or_else(|| anyhow!("User {} not found", user_id))?;
    let user = &clustered.user;

    println!("{}", format!("User ID: {}", user_id).bold().blue());
    println!("{}Gender: {:?}", "• ".green(), user.gender);
    println!("{}Age: {:?}", "• ".green(), user.age);
    println!("{}Occupation: {:?}", "• ".green(), user.occupation);
    println!("{}Zipcode: {}", "• ".green(), user.zipcode);

    let summaries = model.cluster_summaries();
    let summary = &summaries[clustered.cluster];
    println!("{}Cluster: {}", "• ".cyan(), clustered.cluster);
    println!("{}Users in cluster: {}", "• ".cyan(), summary.user_count);
    println!("{}Ratings in cluster: {}", "• ".cyan(), summary.rating_count);
    match summary.avg_rating {
        Some(avg) => println!("{}Cluster average: {:.2}", "• ".cyan(), avg),
        None => println!("{}Cluster average: {}", "• ".cyan(), "no ratings".yellow()),
    }
    Ok(())
}

/// Handle the 'clusters' command
fn handle_clusters(model: &ColdStartModel) {
    println!("{}", "Clusters:".bold().blue());
    for summary in model.cluster_summaries() {
        let avg = summary
            .avg_rating
            .map(|avg| format!("{:.2}", avg))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>3}. {:>6} users  {:>8} ratings  avg {}",
            summary.cluster.to_string().green(),
            summary.user_count,
            summary.rating_count,
            avg
        );
    }
}

/// Handle the 'benchmark' command
///
/// User ids are drawn past the largest known id as well, so every branch
/// of the fallback gets exercised.
fn handle_benchmark(model: &ColdStartModel, requests: usize, max_movie_id: u32) -> Result<()> {
    if requests == 0 || max_movie_id == 0 {
        return Err(anyhow!("requests and max-movie-id must be positive"));
    }
    let max_user_id = model.users().iter().map(|u| u.id()).max().unwrap_or(0).saturating_add(100);

    let queries: Vec<(UserId, MovieId)> = (0..requests)
        .map(|_| {
            let user_id = rand::random::<u32>() % max_user_id + 1;
            let movie_id = rand::random::<u32>() % max_movie_id + 1;
            (user_id, movie_id)
        })
        .collect();

    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    let mut failures = 0;
    for (user_id, movie_id) in queries {
        let start = Instant::now();
        let outcome = model.predict_rating(user_id, movie_id);
        timings.push(start.elapsed());
        if outcome.is_err() {
            failures += 1;
        }
    }

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f64 / total_time.as_secs_f64().max(f64::EPSILON);

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);
    if failures > 0 {
        println!("{} {} queries hit an empty aggregate", "!".yellow(), failures);
    }
    Ok(())
}
