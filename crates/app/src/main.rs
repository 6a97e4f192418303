// CLI modules
mod cli;

use clap::{Parser, Subcommand};
use cli::{args::Args, op::Op, Init, Login, Logout, Scrape, Shell, Signup, Team, Verify};
use sitepad::logging::{init_logging, LogConfig};

command_enum! {
    (Init, Init),
    (Signup, Signup),
    (Login, Login),
    (Logout, Logout),
    (Verify, Verify),
    (Scrape, Scrape),
    (Team, Team),
    (Shell, Shell),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let ctx = match cli::op::OpContext::new(args.remote, args.config_path) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let level = ctx.state.config.log_level().unwrap_or_else(|e| {
        eprintln!("Warning: {}, using info", e);
        tracing::Level::INFO
    });
    let guards = init_logging(&LogConfig {
        level,
        dir: ctx.state.config.log_dir.clone(),
    });

    let code = match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    // flush the non-blocking writers before exiting
    drop(guards);
    std::process::exit(code);
}
