// ABOUTME: Command-line tool that creates an admin account in the configured store
// ABOUTME: Prints the generated password when none is given on the command line

use clap::Parser;
use std::process::ExitCode;

use oia_backend::config::{self, StoreArgs};
use oia_backend::crypto;
use oia_backend::storage::Storage;

#[derive(Parser, Debug)]
#[command(name = "create_admin", version)]
#[command(about = "Create an admin account for the OIA website API")]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    /// Username for the new admin
    #[arg(short, long)]
    username: String,

    /// Password for the new admin; a random one is generated when omitted
    #[arg(short, long)]
    password: Option<String>,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    cli.store.validate()?;
    let storage = Storage::new(cli.store.connect().await?);
    storage.ping().await?;

    let generated = cli.password.is_none();
    let password = cli.password.unwrap_or_else(crypto::generate_password);
    let result = storage.create_admin(&cli.username, &password).await;
    storage.close().await;
    let admin = result?;

    println!("✅ Admin user created");
    println!("   Username: {}", admin.username);
    println!("   Id:       {}", admin.id);
    if generated {
        println!("   Password: {}", password);
        println!("Store this password now; it is not shown again.");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    config::load_env_file();
    config::init_tracing("warn");

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Failed to create admin: {}", e);
            ExitCode::FAILURE
        }
    }
}
