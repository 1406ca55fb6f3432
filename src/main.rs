#[tokio::main]
async fn main() {
    if let Err(e) = six_cities::run().await {
        log::error!("{e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}
