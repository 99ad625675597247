mod catalog;
mod consensus;
mod data;
mod error;
mod satisfaction;
mod server;
mod solver;
mod stats;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    server::run_server().await;
}
