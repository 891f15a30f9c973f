use clap::Parser;
use taskboard_cli::{Cli, Commands, confirm_on_terminal, execute, render};
use taskboard_client::{HttpTaskApi, TaskManager};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut manager = TaskManager::load(HttpTaskApi::new(&cli.api_url)).await;
    if let Some(err) = manager.last_error() {
        anyhow::bail!("cannot load tasks from {}: {}", cli.api_url, err);
    }
    manager.set_filter(cli.filter);
    manager.set_sort_method(cli.sort);

    let command = cli.command.unwrap_or(Commands::List);
    let result = execute(&mut manager, command, confirm_on_terminal).await;
    println!("{}", render(&manager));

    match result {
        Ok(true) => Ok(()),
        Ok(false) => {
            println!("Cancelled.");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
