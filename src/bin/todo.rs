use clap::Parser;
use todo_api_rust::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = todo_api_rust::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("{e:?}"),
            _ => eprintln!("{e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
