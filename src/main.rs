#[tokio::main]
async fn main() {
    if let Err(err) = oicm_mcp::mcp::server::run_stdio().await {
        eprintln!("oicm-mcp: {}", err);
        std::process::exit(1);
    }
}
