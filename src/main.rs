use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use lhdiff::{Assignment, DEFAULT_CONTEXT_SIZE, DiffAlgorithm, LineMatcher, MatchConfig};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lhdiff")]
#[command(about = "Track lines between two versions of a text file")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print, for each line of LEFT, the matching line of RIGHT (or `_` if deleted)
    Match {
        /// Original version of the file
        left: PathBuf,
        /// New version of the file
        right: PathBuf,
        /// Significant context lines considered above and below each line
        #[arg(short, long, default_value_t = DEFAULT_CONTEXT_SIZE)]
        context_size: usize,
        /// Print line contents next to line numbers
        #[arg(short, long)]
        lines: bool,
        /// How added lines claim removed lines
        #[arg(long, value_enum, default_value_t = AssignmentArg::Overwrite)]
        assignment: AssignmentArg,
        /// Line diff algorithm
        #[arg(long, value_enum, default_value_t = AlgorithmArg::Myers)]
        algorithm: AlgorithmArg,
    },
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Print the man page
    Man,
}

#[derive(Clone, Copy, ValueEnum)]
enum AssignmentArg {
    /// Later matches replace earlier ones for the same left line
    Overwrite,
    /// Highest-scoring matches first, each line used once
    BestFirst,
}

impl From<AssignmentArg> for Assignment {
    fn from(arg: AssignmentArg) -> Self {
        match arg {
            AssignmentArg::Overwrite => Assignment::Overwrite,
            AssignmentArg::BestFirst => Assignment::BestFirst,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    Myers,
    Patience,
    Lcs,
}

impl From<AlgorithmArg> for DiffAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Myers => DiffAlgorithm::Myers,
            AlgorithmArg::Patience => DiffAlgorithm::Patience,
            AlgorithmArg::Lcs => DiffAlgorithm::Lcs,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Match {
            left,
            right,
            context_size,
            lines,
            assignment,
            algorithm,
        } => {
            let matcher = LineMatcher::new(MatchConfig {
                context_size,
                assignment: assignment.into(),
                algorithm: algorithm.into(),
            });
            let result = matcher.match_files(&left, &right)?;
            io::stdout().write_all(lhdiff::format_pairs(&result, lines).as_bytes())?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "lhdiff", &mut io::stdout());
        }
        Commands::Man => {
            clap_mangen::Man::new(Cli::command()).render(&mut io::stdout())?;
        }
    }

    Ok(())
}
