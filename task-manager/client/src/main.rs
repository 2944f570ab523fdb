use clap::{Parser, Subcommand};
use task_manager_client::ui::{render_alerts, render_task_list};
use task_manager_client::{AlertStore, HttpTasksApi, TaskStore};
use task_manager_core::TaskId;

#[derive(Parser, Debug)]
#[command(about = "Manage pending tasks from the terminal")]
struct Cli {
    /// Base URL of the task JSON API
    #[arg(long, env = "TASK_API_URL", default_value = "http://localhost:8080/api")]
    api_url: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Show the most recent pending tasks
    List,
    /// Create a task
    Add { title: String, description: String },
    /// Mark a pending task as done
    Complete { id: TaskId },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    let mut store = TaskStore::new(HttpTasksApi::new(cli.api_url), AlertStore::new());

    // A failed create leaves the list unfetched, so only the alert is shown.
    let (outcome, show_list) = match cli.command {
        Commands::List => {
            store.fetch_tasks().await;
            (Ok(()), true)
        }
        Commands::Add { title, description } => {
            let result = store.create_task(&title, &description).await.map(|_| ());
            let fetched = result.is_ok();
            (result, fetched)
        }
        Commands::Complete { id } => (store.complete_task(id).await, true),
    };

    print!("{}", render_alerts(&store.alerts().alerts()));
    if show_list {
        print!("{}", render_task_list(store.state()));
    }

    outcome?;
    Ok(())
}
