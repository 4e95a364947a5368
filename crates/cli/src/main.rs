use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use ideas_app::{App, Idea};
use ideas_db::RecordId;
use ideas_kernel::settings::Settings;

/// Work with the idea list held by an in-memory store.
///
/// Every run starts from the configured bootstrap records, applies one
/// command and prints the resulting list.
#[derive(Debug, Parser)]
#[command(name = "ideas-cli", version, about)]
struct Cli {
    /// Print the list as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show every idea
    List,
    /// Create an idea from a title and body
    Add {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
    },
    /// Edit an idea in place and save it
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
    },
    /// Delete an idea
    Delete { id: u64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load ideas settings")?;
    ideas_telemetry::init(&settings.telemetry)?;

    let app = App::start(settings).await?;
    let result = run(&app, cli.command).await;
    let ideas = app.controller().ideas().await;
    app.shutdown().await?;

    result?;
    print_ideas(&ideas?, cli.json)
}

async fn run(app: &App, command: Command) -> anyhow::Result<()> {
    let mut controller = app.controller();

    match command {
        Command::List => {}
        Command::Add { title, body } => {
            controller.title = title;
            controller.body = body;
            let idea = controller.add_new_idea().await?;
            tracing::debug!(id = ?idea.id, "added from command line");
        }
        Command::Edit { id, title, body } => {
            let item = controller
                .items()
                .await?
                .into_iter()
                .find(|item| item.id() == Some(RecordId::new(id)))
                .ok_or_else(|| anyhow!("idea {} not found", id))?;

            item.edit().await?;
            if let Some(title) = title {
                item.set_title(title);
            }
            if let Some(body) = body {
                item.set_body(body);
            }
            item.edit()
                .await
                .with_context(|| format!("failed to save idea {}", id))?;
        }
        Command::Delete { id } => {
            let item = controller
                .items()
                .await?
                .into_iter()
                .find(|item| item.id() == Some(RecordId::new(id)))
                .ok_or_else(|| anyhow!("idea {} not found", id))?;

            item.delete()
                .await
                .with_context(|| format!("failed to delete idea {}", id))?;
        }
    }

    Ok(())
}

fn print_ideas(ideas: &[Idea], json: bool) -> anyhow::Result<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(ideas).context("failed to render ideas as JSON")?;
        println!("{rendered}");
        return Ok(());
    }

    for idea in ideas {
        let id = idea.id.map(|id| id.to_string()).unwrap_or_default();
        println!("{}\t{}\t{}", id, idea.title_str(), idea.body_str());
    }
    Ok(())
}
