use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), torikeshi::provider::error::DispatchError> {
    use torikeshi::util::cli::*;

    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let opts = ServerOptions::parse();
    run_server(opts).await
}
