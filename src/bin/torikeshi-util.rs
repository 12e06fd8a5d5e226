use clap::Parser;

#[tokio::main]
async fn main() {
    use torikeshi::util::cli::*;

    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let opts = Options::parse();
    let envelope = run_cli_action(opts).await;

    match serde_json::to_string_pretty(&envelope) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to encode result: {}", e),
    }

    if !envelope.is_success() {
        std::process::exit(1);
    }
}
