use clap::{Parser, Subcommand};
use semchunk::Result;
use semchunk::commands::{clear_cache, init_config, process_documents, show_config};

#[derive(Parser)]
#[command(name = "semchunk")]
#[command(about = "Semantic chunking pipeline with embedding-driven boundary detection")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk a batch of document files
    Process {
        /// Paths of the documents to chunk
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Wipe the chunk cache, forcing full recomputation
    ClearCache,
    /// Manage the configuration file
    Config {
        /// Show the active configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process { paths } => {
            process_documents(paths).await?;
        }
        Commands::ClearCache => {
            clear_cache().await?;
        }
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                init_config()?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn cli_parsing() {
        let cli = Cli::try_parse_from(["semchunk", "process", "doc.txt"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Process { paths } = parsed.command {
                assert_eq!(paths, vec!["doc.txt"]);
            }
        }
    }

    #[test]
    fn process_requires_at_least_one_path() {
        let cli = Cli::try_parse_from(["semchunk", "process"]);
        assert!(cli.is_err());
    }

    #[test]
    fn process_accepts_multiple_paths() {
        let cli = Cli::try_parse_from(["semchunk", "process", "a.txt", "b.txt", "c.txt"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Process { paths } = parsed.command {
                assert_eq!(paths.len(), 3);
            }
        }
    }

    #[test]
    fn clear_cache_command() {
        let cli = Cli::try_parse_from(["semchunk", "clear-cache"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            matches!(parsed.command, Commands::ClearCache);
        }
    }

    #[test]
    fn config_show_flag() {
        let cli = Cli::try_parse_from(["semchunk", "config", "--show"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Config { show } = parsed.command {
                assert!(show);
            }
        }
    }

    #[test]
    fn invalid_command() {
        let cli = Cli::try_parse_from(["semchunk", "invalid"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
        }
    }

    #[test]
    fn help_message() {
        let cli = Cli::try_parse_from(["semchunk", "--help"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        }
    }
}
