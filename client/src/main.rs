use std::io::{self, Write};

use clap::Parser;
use tokio::io::AsyncBufReadExt;

use todo_client::api::TodoApi;
use todo_client::app::TodoApp;
use todo_client::state::AppState;

/// Line-mode client for the todo API.
#[derive(Parser, Debug)]
struct Cli {
    /// Base URL of the todo API server.
    #[arg(
        long,
        env = "TODO_API_BASE_URL",
        default_value = "http://localhost:8080"
    )]
    base_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let args = Cli::parse();

    let mut app = TodoApp::new(TodoApi::new(args.base_url));
    app.refresh().await;
    render(app.state());
    print_help();

    // Read stdin through tokio so waiting for input does not park the
    // runtime thread.
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else { break };
        let input = line.trim();
        let (command, rest) = match input.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (input, ""),
        };
        match command {
            "" => continue,
            "list" => {}
            "add" => {
                if rest.is_empty() {
                    println!("usage: add <title>");
                    continue;
                }
                // When an item is under edit the submission keeps its
                // completion state, like the pre-filled form would.
                let is_complete = app
                    .state()
                    .editing()
                    .map(|todo| todo.is_complete)
                    .unwrap_or(false);
                app.submit(rest, is_complete).await;
            }
            "done" => match rest.parse() {
                Ok(id) => app.toggle(id).await,
                Err(_) => {
                    println!("usage: done <id>");
                    continue;
                }
            },
            "edit" => match rest.parse() {
                Ok(id) => {
                    if !app.edit(id) {
                        println!("no todo with id {}", id);
                        continue;
                    }
                }
                Err(_) => {
                    println!("usage: edit <id>");
                    continue;
                }
            },
            "cancel" => app.cancel(),
            "rm" => match rest.parse() {
                Ok(id) => app.delete(id).await,
                Err(_) => {
                    println!("usage: rm <id>");
                    continue;
                }
            },
            "completed" => {
                let show = !app.state().show_completed();
                app.set_show_completed(show);
            }
            "refresh" => app.refresh().await,
            "help" => {
                print_help();
                continue;
            }
            "quit" | "exit" => break,
            _ => {
                println!("unknown command '{}'", command);
                continue;
            }
        }
        render(app.state());
    }

    Ok(())
}

fn render(state: &AppState) {
    if let Some(error) = state.error() {
        println!("! {}", error);
    }
    if let Some(editing) = state.editing() {
        println!(
            "(editing #{} '{}'; 'add <new title>' saves, 'cancel' aborts)",
            editing.id, editing.title
        );
    }
    let visible = state.visible_todos();
    if visible.is_empty() {
        println!("nothing to do");
        return;
    }
    for todo in visible {
        let mark = if todo.is_complete { "x" } else { " " };
        println!("[{}] #{} {}", mark, todo.id, todo.title);
    }
}

fn print_help() {
    println!(
        "commands: list, add <title>, done <id>, edit <id>, cancel, rm <id>, completed, refresh, quit"
    );
}
