use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tilores_cli::utils::config::{ConfigManager, TiloresConfig};
use tilores_cli::utils::logging::init_logging;
use tilores_cli::{
    Command, EdgesCommand, EntityCommand, GenCommand, SearchCommand, TokenCommand,
};

#[derive(Parser)]
#[command(name = "tilores")]
#[command(about = "Query a Tilores instance and generate Rust models from its schema")]
struct Cli {
    /// Project directory holding tilores.yaml
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Rust models from schema.graphql
    Generate {
        /// Directory containing schema.graphql
        #[arg(long)]
        src: Option<PathBuf>,
        /// Directory to write models.rs and mod.rs into
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Search for entities
    Search {
        /// Search parameters as a JSON object
        params: String,
        /// Record field to return, dotted for nested fields (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,
        /// Record mask as a JSON object
        #[arg(long)]
        mask: Option<String>,
    },
    /// Fetch an entity with record insights
    Entity {
        id: String,
        /// Field to report the most frequent values of (repeatable)
        #[arg(long)]
        frequency: Vec<String>,
        /// Number of values per frequency distribution
        #[arg(long, default_value_t = 1)]
        top: i64,
        /// Field to list all values of (repeatable)
        #[arg(long)]
        values: Vec<String>,
        /// Field to list the distinct values of (repeatable)
        #[arg(long)]
        distinct: Vec<String>,
        /// `<time field>:<field>` taken from the newest record (repeatable)
        #[arg(long)]
        newest: Vec<String>,
    },
    /// Print the edges of an entity
    Edges { id: String },
    /// Check the credentials by fetching an access token
    Token {
        /// Print the token
        #[arg(long)]
        show: bool,
    },
}

fn load_config(project: &Path) -> Result<(PathBuf, TiloresConfig)> {
    let root = ConfigManager::find_project_root(project).unwrap_or_else(|| project.to_path_buf());
    let mut manager = ConfigManager::new(&root);
    manager.load()?;
    Ok((root, manager.get_effective_config()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug)?;

    let project = cli.project.unwrap_or_else(|| PathBuf::from("."));
    let (root, config) = load_config(&project)?;

    let command: Box<dyn Command> = match cli.command {
        Commands::Generate { src, out } => Box::new(GenCommand {
            src_dir: src.unwrap_or_else(|| root.join(&config.codegen.src_dir)),
            out_dir: out.unwrap_or_else(|| root.join(&config.codegen.out_dir)),
        }),
        Commands::Search { params, fields, mask } => Box::new(SearchCommand {
            config,
            params,
            fields,
            mask,
        }),
        Commands::Entity {
            id,
            frequency,
            top,
            values,
            distinct,
            newest,
        } => Box::new(EntityCommand {
            config,
            id,
            frequency,
            top,
            values,
            distinct,
            newest,
        }),
        Commands::Edges { id } => Box::new(EdgesCommand { config, id }),
        Commands::Token { show } => Box::new(TokenCommand { config, show }),
    };

    command.execute().await
}
