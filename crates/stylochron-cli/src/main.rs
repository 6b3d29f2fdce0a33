//! CLI for stylochron — authorship as a time series.

mod commands;
mod corpus;
mod vectorize;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stylochron")]
#[command(about = "stylochron — authorship verification and attribution from writing-style time series")]
#[command(version = stylochron_core::VERSION)]
struct Cli {
    /// Log sweep steps and decisions (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Sweep and decision options shared by the analysis commands.
#[derive(clap::Args)]
struct AnalysisArgs {
    /// Distance metric: canberra (default), euclidean, spearman
    #[arg(long, value_parser = ["canberra", "euclidean", "spearman"])]
    metric: Option<String>,

    /// First window size of the sweep
    #[arg(long)]
    start: Option<usize>,

    /// Window sizes stop before this value
    #[arg(long)]
    end: Option<usize>,

    /// Window size increment
    #[arg(long)]
    step: Option<usize>,

    /// Threshold preset: default, strict (1% significance, stop at 0.999)
    /// or permissive (10% significance, stop at 0.95)
    #[arg(long, value_parser = ["default", "strict", "permissive"], conflicts_with = "config")]
    preset: Option<String>,

    /// Analysis config JSON (sweep, significance_level, stop_confidence, metric).
    /// Command-line flags override its values.
    #[arg(long)]
    config: Option<String>,

    /// Write the machine-readable report as JSON
    #[arg(long)]
    output: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split plain-text files into chunks and build stop-word frequency vectors
    Vectorize {
        /// Index JSON: a list of { "author": ..., "path": ... } entries
        index: String,

        /// Stop-word list, one word per line
        #[arg(long)]
        stopwords: String,

        /// Chunk length in characters
        #[arg(long, default_value = "7000")]
        chunk_size: usize,

        /// Where to write the vectorized corpus JSON
        #[arg(long, default_value = "corpus.json")]
        output: String,
    },

    /// Decide whether two corpus documents share an author
    Verify {
        /// Vectorized corpus JSON
        corpus: String,

        /// Index of the first document
        first: usize,

        /// Index of the second document
        second: usize,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Attribute one corpus document to an author among the remaining documents
    Determine {
        /// Vectorized corpus JSON
        corpus: String,

        /// Index of the document to attribute (held out from the candidates)
        #[arg(long, default_value = "0")]
        unknown: usize,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// All-pairs verification matrix and leave-one-out attribution accuracy
    Collect {
        /// Vectorized corpus JSON
        corpus: String,

        /// Skip the all-pairs verification matrix
        #[arg(long)]
        no_pairs: bool,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default);
    let mut builder = env_logger::Builder::from_env(env);
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Vectorize {
            index,
            stopwords,
            chunk_size,
            output,
        } => commands::vectorize::run(&index, &stopwords, chunk_size, &output),
        Commands::Verify {
            corpus,
            first,
            second,
            analysis,
        } => commands::verify::run(&corpus, first, second, &analysis.into()),
        Commands::Determine {
            corpus,
            unknown,
            analysis,
        } => commands::determine::run(&corpus, unknown, &analysis.into()),
        Commands::Collect {
            corpus,
            no_pairs,
            analysis,
        } => commands::collect::run(&corpus, !no_pairs, &analysis.into()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

impl From<AnalysisArgs> for commands::AnalysisOptions {
    fn from(args: AnalysisArgs) -> Self {
        Self {
            metric: args.metric,
            start: args.start,
            end: args.end,
            step: args.step,
            preset: args.preset,
            config_path: args.config,
            output_path: args.output,
        }
    }
}
