use std::collections::HashSet;

use clap::Args;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use common::prelude::{EditSurface, TeamId};
use sitepad::scrape::ScrapeOutcome;
use sitepad::session::{Authorized, GateError};
use sitepad::team::{TeamError, TeamView};

use crate::cli::op::OpContext;

const HELP: &str = "\
Commands:
  scrape <url>...       scrape websites into the tree
  tree                  show the file tree
  fold <path>           collapse or expand a directory
  select <path>         open (or close) the file at <path>
  show                  print the open file
  edit <text>           replace the open file's content
  urls                  list submitted URLs
  team                  show your team, or how to get one
  team create <id>      create a team and become its admin
  team list             list teams you can join
  team choose <id>      pick a team from the list
  team join             join the picked team
  team cancel           close the team list
  team invite <email>   invite a user into your team
  logout                sign out and leave
  quit                  leave";

#[derive(Args, Debug, Clone)]
pub struct Shell;

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Default)]
struct ShellState {
    collapsed: HashSet<String>,
    // handed out on select; edits through an older one are dropped
    surface: Option<EditSurface>,
}

enum Flow {
    Continue(String),
    Exit(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Shell {
    type Error = ShellError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let auth = ctx.authorize().await?;

        let mut stdout = tokio::io::stdout();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut state = ShellState::default();

        let greeting = match auth.identity() {
            Some(email) => format!("Signed in as {}. Type 'help' for commands.\n", email),
            None => "Signed in. Type 'help' for commands.\n".to_string(),
        };
        stdout.write_all(greeting.as_bytes()).await?;

        loop {
            stdout.write_all(b"sitepad> ").await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                return Ok(String::new());
            };

            match run_line(ctx, &auth, &mut state, line.trim()).await {
                Flow::Continue(output) => {
                    if !output.is_empty() {
                        stdout.write_all(output.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                    }
                }
                Flow::Exit(output) => return Ok(output),
            }

            // a 401 anywhere sends us back to sign-in
            if ctx.session.authorized().is_err() {
                return Ok("Session ended. Run 'sitepad login' to sign in again.".to_string());
            }
        }
    }
}

async fn run_line(ctx: &OpContext, auth: &Authorized, state: &mut ShellState, line: &str) -> Flow {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let output = match command {
        "" => String::new(),
        "help" => HELP.to_string(),
        "quit" | "exit" => return Flow::Exit(String::new()),
        "logout" => {
            return Flow::Exit(match ctx.session.logout() {
                Ok(_) => "Signed out".to_string(),
                Err(e) => format!("Error: {}", e),
            })
        }
        "scrape" => scrape(ctx, auth, rest).await,
        "tree" => render_tree(ctx, state),
        "fold" => {
            if !state.collapsed.remove(rest) {
                state.collapsed.insert(rest.to_string());
            }
            render_tree(ctx, state)
        }
        "select" => select(ctx, state, rest),
        "show" => show(ctx, state),
        "edit" => edit(ctx, state, rest),
        "urls" => {
            let workspace = ctx.session.workspace();
            if workspace.submitted().is_empty() {
                "No URLs submitted yet".to_string()
            } else {
                workspace
                    .submitted()
                    .iter()
                    .map(|url| url.to_string())
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        "team" => team(ctx, auth, rest).await,
        other => format!("Unknown command '{}'. Type 'help' for commands.", other),
    };
    Flow::Continue(output)
}

async fn scrape(ctx: &OpContext, auth: &Authorized, rest: &str) -> String {
    if rest.is_empty() {
        return "Usage: scrape <url>...".to_string();
    }
    let results = ctx
        .session
        .scrape()
        .submit_all(auth, rest.split_whitespace())
        .await;

    let mut lines = Vec::new();
    for (url, result) in results {
        match result {
            Ok(ScrapeOutcome::Merged(report)) => {
                let mut line = format!("{} -> {} ({} files)", report.url, report.site, report.files);
                if report.selection_cleared {
                    line.push_str(", open file was replaced");
                }
                lines.push(line);
            }
            Ok(ScrapeOutcome::Duplicate) => lines.push(format!("{} already submitted", url)),
            Ok(ScrapeOutcome::Discarded) | Err(_) => {}
        }
    }
    if let Some(message) = ctx.session.scrape().last_error() {
        lines.push(message);
    }
    lines.join("\n")
}

fn render_tree(ctx: &OpContext, state: &ShellState) -> String {
    let workspace = ctx.session.workspace();
    workspace
        .tree()
        .render(&state.collapsed, workspace.selection().key())
        .trim_end()
        .to_string()
}

fn select(ctx: &OpContext, state: &mut ShellState, path: &str) -> String {
    let mut workspace = ctx.session.workspace();
    if let Err(e) = workspace.select_path(path) {
        return format!("Error: {}", e);
    }
    match workspace.open_document() {
        Some((surface, body)) => {
            let output = format!("[{}]\n{}", surface.key(), body);
            state.surface = Some(surface);
            output
        }
        None => {
            state.surface = None;
            "Closed".to_string()
        }
    }
}

fn show(ctx: &OpContext, state: &mut ShellState) -> String {
    let workspace = ctx.session.workspace();
    match workspace.open_document() {
        Some((surface, body)) => {
            let output = format!("[{}]\n{}", surface.key(), body);
            state.surface = Some(surface);
            output
        }
        None => "No file open".to_string(),
    }
}

fn edit(ctx: &OpContext, state: &ShellState, body: &str) -> String {
    let Some(surface) = &state.surface else {
        return "No file open".to_string();
    };
    if ctx.session.workspace().edit_from(surface, body) {
        "Saved".to_string()
    } else {
        "The open file changed; select it again before editing".to_string()
    }
}

async fn team(ctx: &OpContext, auth: &Authorized, rest: &str) -> String {
    let teams = ctx.session.teams();
    let (sub, arg) = match rest.split_once(char::is_whitespace) {
        Some((sub, arg)) => (sub, arg.trim()),
        None => (rest, ""),
    };

    // create and join are only offered until a team is installed
    let has_team = matches!(teams.view(), TeamView::Details(_));

    let result = match sub {
        "" => {
            return match teams.view() {
                TeamView::Details(team) => team.to_string(),
                TeamView::EntryPoints => {
                    "You are not on a team. Use 'team create <id>' or 'team list'.".to_string()
                }
            }
        }
        "create" if !has_team => teams
            .create(auth, TeamId::from(arg))
            .await
            .map(|team| team.to_string()),
        "list" if !has_team => teams.list_available(auth).await.map(|ids| {
            if ids.is_empty() {
                "No teams available".to_string()
            } else {
                ids.iter()
                    .map(|id| format!("  - {}", id))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }),
        "choose" if !has_team => teams
            .choose(TeamId::from(arg))
            .map(|_| format!("Selected {}", arg)),
        "join" if !has_team => teams.join(auth).await.map(|team| team.to_string()),
        "cancel" => {
            teams.dismiss();
            return String::new();
        }
        "invite" => teams.invite(auth, arg).await.map(|_| {
            teams.message().unwrap_or_else(|| "Invitation sent".to_string())
        }),
        "create" | "list" | "choose" | "join" => {
            return "You are already on a team".to_string();
        }
        other => return format!("Unknown team command '{}'", other),
    };

    match result {
        Ok(output) => output,
        Err(e @ TeamError::Api(_)) => {
            format!("Error: {}", teams.message().unwrap_or_else(|| e.to_string()))
        }
        Err(e) => format!("Error: {}", e),
    }
}
