use clap::Parser;
use registry_auth_pusher::cli::{Args, Runner};
use std::process;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let runner = match Runner::new(args) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("❌ {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = runner.run().await {
        runner.output().error(&e.to_string());
        process::exit(1);
    }
}
