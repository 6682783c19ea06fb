//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{screenplay_cmd, script_cmd, tui};
use crate::domain::ElementType;
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "reel")]
#[command(author, version, about = "Local-first screenplay composition")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new screenplay project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Manage scripts (create, list, rename, select)
    #[command(subcommand)]
    Script(script_cmd::ScriptCommands),

    /// Replace a script's content with a tagged draft file
    Import {
        /// Draft file with one `type: text` line per screenplay line
        file: std::path::PathBuf,

        /// Script ID or name (defaults to the selected script)
        #[arg(long, short)]
        script: Option<String>,
    },

    /// Print a script as ordered, typed lines
    Lines {
        /// Script ID or name (defaults to the selected script)
        #[arg(long, short)]
        script: Option<String>,
    },

    /// Export a script as formatted plain text
    Export {
        /// Script ID or name (defaults to the selected script)
        #[arg(long, short)]
        script: Option<String>,

        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<std::path::PathBuf>,
    },

    /// Suggest completions for a scene heading or character line
    Suggest {
        /// Line type being typed
        element: ElementType,

        /// Text typed so far
        #[arg(default_value = "")]
        text: String,

        /// Script ID or name (defaults to the selected script)
        #[arg(long, short)]
        script: Option<String>,
    },

    /// Show which line type follows a line break
    Next {
        /// Type of the current line (none if there is no line yet)
        element: Option<ElementType>,
    },

    /// Open the interactive editor
    Write {
        /// Script ID or name (defaults to the selected script)
        #[arg(long, short)]
        script: Option<String>,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let format = match cli.format {
        Some(format) => format,
        None => Config::load()
            .map(|config| config.global.default_format.into())
            .unwrap_or_default(),
    };
    let output = Output::new(format, cli.verbose);

    output.verbose("Reel starting");

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.verbose_ctx(
                "init",
                &format!("Created .screenplay directory at: {}", project.project_dir().display()),
            );
            output.success(&format!(
                "Initialized screenplay project at {}",
                project.root().display()
            ));
        }

        Commands::Script(cmd) => script_cmd::run(cmd, &output)?,

        Commands::Import { file, script } => {
            output.verbose_ctx("import", &format!("Importing draft: {}", file.display()));
            screenplay_cmd::import(&output, &file, script.as_deref())?
        }
        Commands::Lines { script } => screenplay_cmd::lines(&output, script.as_deref())?,
        Commands::Export { script, output: path } => {
            screenplay_cmd::export(&output, script.as_deref(), path.as_deref())?
        }
        Commands::Suggest { element, text, script } => {
            output.verbose_ctx("suggest", &format!("Suggesting for {} '{}'", element, text));
            screenplay_cmd::suggest(&output, element, &text, script.as_deref())?
        }
        Commands::Next { element } => screenplay_cmd::next(&output, element),

        Commands::Write { script } => {
            if output.is_json() {
                anyhow::bail!("The editor does not support JSON output");
            }
            tui::run(&output, script.as_deref())?
        }
    }

    Ok(())
}
