//! proconq-chatd — the chat server binary.
//!
//!   proconq-chatd [port]
//!
//! Reads `PROCONQ_DB_PATH` and `PROCONQ_ADMIN_PASSWORD` from the environment.

#[tokio::main]
async fn main() {
    if std::env::var("RUST_LOG").is_err() {
        // SAFETY: single-threaded at this point, no other threads reading env
        unsafe { std::env::set_var("RUST_LOG", "proconq_server=info"); }
    }
    env_logger::init();

    if let Err(e) = run().await {
        eprintln!("\n✗ {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = proconq_server::ServerConfig::from_env()?;
    proconq_server::run(config).await?;
    Ok(())
}
