mod constraints;
mod data;
mod ranking;
mod report;
mod server;
mod solver;
mod validation;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let addr = std::env::var("TIMETABLE_ADDR").unwrap_or_else(|_| server::DEFAULT_ADDR.to_string());

    server::run_server(&addr).await
}
