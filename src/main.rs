// src/main.rs

use orte_runner::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(code) => std::process::exit(process_exit_status(code)),
        Err(err) => {
            eprintln!("orte-runner error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<i32> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}

/// Map a launcher exit code onto something the OS accepts as our own status.
fn process_exit_status(code: i32) -> i32 {
    if (0..=255).contains(&code) { code } else { 1 }
}
