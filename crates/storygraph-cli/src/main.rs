use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use storygraph_api::{EventId, GraphRequest, ObjectId, OpenEventRequest};
use storygraph_app::{AppController, StoryGraphSettings};
use storygraph_storage::{Storage, StoryFixture};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite database
    #[arg(short, long, global = true, default_value = "storygraph.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a JSON fixture of story objects and relations into the database
    Import {
        fixture: PathBuf,
        /// Delete existing content first
        #[arg(long)]
        clear: bool,
    },
    /// Print the graph around the given seeds as JSON
    Graph {
        /// Event scope
        #[arg(short, long)]
        scope: String,
        #[arg(long = "thread", value_delimiter = ',')]
        thread_ids: Vec<String>,
        #[arg(long = "character", value_delimiter = ',')]
        character_ids: Vec<String>,
        #[arg(long = "faction", value_delimiter = ',')]
        faction_ids: Vec<String>,
        /// Engine settings file
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Print database counts
    Stats,
}

fn object_ids(raw: Vec<String>) -> Vec<ObjectId> {
    raw.into_iter().map(ObjectId).collect()
}

fn open_controller(db: &Path, config: Option<PathBuf>) -> Result<AppController> {
    let settings = match config {
        Some(path) => StoryGraphSettings::load(&path)?,
        None => StoryGraphSettings::default(),
    };
    let controller = AppController::with_settings(settings);
    controller.open_event_database(OpenEventRequest {
        path: db.to_string_lossy().to_string(),
    })?;
    Ok(controller)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Import { fixture, clear } => {
            let fixture = StoryFixture::load(&fixture)?;
            let mut storage = Storage::open(&cli.db)?;
            if clear {
                storage.clear()?;
            }
            storage.import_fixture(&fixture)?;
            let stats = storage.get_stats()?;
            info!(db = %cli.db.display(), "Import finished");
            println!(
                "Imported {} objects and {} relations ({} objects, {} relations in database).",
                fixture.objects.len(),
                fixture.relations.len(),
                stats.object_count,
                stats.relation_count
            );
        }
        Command::Graph {
            scope,
            thread_ids,
            character_ids,
            faction_ids,
            config,
            pretty,
        } => {
            let controller = open_controller(&cli.db, config)?;
            let response = controller.story_graph(GraphRequest {
                scope: EventId(scope),
                thread_ids: object_ids(thread_ids),
                character_ids: object_ids(character_ids),
                faction_ids: object_ids(faction_ids),
            })?;
            let json = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{json}");
        }
        Command::Stats => {
            let controller = open_controller(&cli.db, None)?;
            println!("{}", serde_json::to_string_pretty(&controller.stats()?)?);
        }
    }

    Ok(())
}
