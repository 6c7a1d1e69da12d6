use anyhow::Result;

#[cfg(feature = "cli")]
mod main {
    use super::*;
    use anyhow::bail;
    use clap::{Parser, Subcommand};
    use planedrop::{SessionConfig, io::write_ron_file, run};
    use std::path::PathBuf;

    #[derive(Debug, Parser)]
    #[command(about = "Headless runner for the plane drop AR session", long_about = None)]
    struct Cli {
        #[command(subcommand)]
        command: Command,
    }

    #[derive(Debug, Subcommand)]
    enum Command {
        /// Replay a scripted session and print a summary
        Replay {
            /// Path to RON configuration file to use
            #[arg(short, long)]
            config: Option<PathBuf>,
            /// Path to RON replay script
            #[arg(short, long)]
            script: PathBuf,
        },
        /// Generate the default RON configuration file
        GenerateConfig {
            /// Path where the file should be written
            #[arg(short, long)]
            output_path: PathBuf,
            /// Overwrite any existing file at the given path
            #[arg(short, long)]
            force_overwrite: bool,
        },
    }

    pub fn main() -> Result<()> {
        run::init_logging()?;

        let cli = Cli::parse();

        match cli.command {
            Command::Replay { config, script } => {
                let summary = run::run_replay_from_files(config.as_deref(), &script)?;
                println!("{summary}");
                Ok(())
            }
            Command::GenerateConfig {
                output_path,
                force_overwrite,
            } => {
                if !force_overwrite && output_path.exists() {
                    bail!("File {} already exists", output_path.display());
                }
                write_ron_file(&SessionConfig::default(), output_path)
            }
        }
    }
}

#[cfg(not(feature = "cli"))]
mod main {
    use super::*;

    pub fn main() -> Result<()> {
        anyhow::bail!("This binary requires the `cli` feature to be enabled.")
    }
}

fn main() -> Result<()> {
    main::main()
}
