use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::retry::RetryPolicy;
use crate::twitter::DEFAULT_API_BASE;

#[derive(Parser, Debug)]
#[command(
    name = "follow-overlap",
    version,
    about = "Find the accounts that a set of Twitter accounts follow in common and draw the graph"
)]
pub struct Cli {
    /// File with one handle per line
    #[arg(long, default_value = "candidates.txt")]
    pub input: PathBuf,

    /// Rendered image
    #[arg(long, default_value = "network.png")]
    pub output: PathBuf,

    /// Intermediate Graphviz file
    #[arg(long, default_value = "network.dot")]
    pub dot: PathBuf,

    /// Graphviz layout engine used to rasterise the graph
    #[arg(long, default_value = "neato")]
    pub layout: String,

    /// Two accounts whose shared friends are listed by name
    #[arg(
        long,
        num_args = 2,
        value_names = ["A", "B"],
        default_values_t = [String::from("realDonaldTrump"), String::from("HillaryClinton")]
    )]
    pub pair: Vec<String>,

    /// App-only bearer token
    #[arg(long, env = "TWITTER_BEARER_TOKEN", hide_env_values = true)]
    pub bearer_token: Option<String>,

    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Attempts per API request before giving up
    #[arg(long, default_value_t = 5)]
    pub max_attempts: u32,

    /// Pause between attempts, in seconds
    #[arg(long, default_value_t = 15 * 60)]
    pub retry_delay_secs: u64,

    /// Read follow lists from a `handle,user_id,friend_id` CSV instead of the API
    #[arg(long)]
    pub follows_csv: Option<PathBuf>,

    /// Also write the overlap table to this CSV file
    #[arg(long)]
    pub overlap_csv: Option<PathBuf>,

    /// How many of the most-followed accounts to list
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Open the image once rendered
    #[arg(long)]
    pub open: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_secs(self.retry_delay_secs))
    }

    pub fn reference_pair(&self) -> (&str, &str) {
        (&self.pair[0], &self.pair[1])
    }
}
