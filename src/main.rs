#[tokio::main]
async fn main() {
  if let Err(e) = hyron_lib::run().await {
    eprintln!("hyron failed: {}", e);
    std::process::exit(1);
  }
}
