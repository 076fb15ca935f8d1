use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};

use super::materials::MaterialCommand;
use crate::config::Config;
use crate::materials::{Database, MaterialRepository};
use crate::tui;

/// Revise - keep your study materials at hand in the terminal
#[derive(Parser, Debug)]
#[command(
    name = "revise",
    version,
    about = "Keep your study materials at hand in the terminal",
    long_about = r#"Revise stores named blocks of study text and lets you add, edit, search
and delete them from a terminal UI or straight from the command line.

Examples:
  revise                                   # Start interactive mode
  revise add -n "Biology" -e "Cells..."    # Add a material
  revise search mitochondria               # Search names and text
  revise --cwd /path/to/notes              # Set working directory"#
)]
pub struct Cli {
    /// Current working directory
    #[arg(short = 'c', long = "cwd", global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    #[command(flatten)]
    Material(MaterialCommand),
}

impl Cli {
    /// Whether this invocation starts the terminal UI
    pub fn is_interactive(&self) -> bool {
        self.command.is_none()
    }

    /// Change directory if asked, then resolve configuration
    pub async fn load_config(&self) -> Result<Config> {
        if let Some(cwd) = &self.cwd {
            std::env::set_current_dir(cwd)
                .map_err(|e| anyhow::anyhow!("Failed to change directory to {}: {}", cwd.display(), e))?;
        }

        let mut config = Config::init().await?;
        if let Some(cwd) = &self.cwd {
            config.cwd = cwd.clone();
        }
        config.validate()?;
        Ok(config)
    }

    pub async fn execute(self, config: Config) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }
        if let Some(cwd) = &self.cwd {
            info!("Changed working directory to: {}", cwd.display());
        }

        let database_path = config.database_path();
        debug!("Opening database at {}", database_path.display());
        let repository = MaterialRepository::new(Database::open(&database_path)?);

        match self.command {
            Some(Commands::Material(command)) => {
                let stdout = io::stdout();
                command.execute(&repository, &mut stdout.lock())
            }
            None => {
                info!("Starting interactive mode");
                tui::run(&config, repository).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["revise", "--debug"]).unwrap();
        assert!(cli.debug);
        assert!(cli.is_interactive());
    }

    #[test]
    fn test_material_subcommands_parse() {
        let cli = Cli::try_parse_from(["revise", "add", "--name", "Art", "--extract", "Monet painted water lilies"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Material(MaterialCommand::Add {
                name: "Art".into(),
                extract: "Monet painted water lilies".into(),
            }))
        );

        let cli = Cli::try_parse_from(["revise", "update", "abc", "-n", "Arts"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Material(MaterialCommand::Update { ref name, extract: None, .. })) if name.as_deref() == Some("Arts")
        ));

        assert!(Cli::try_parse_from(["revise", "add", "--name", "Art"]).is_err());
    }
}
