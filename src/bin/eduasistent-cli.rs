#[path = "eduasistent-cli/app.rs"]
mod app;
#[path = "eduasistent-cli/args.rs"]
mod args;
#[path = "eduasistent-cli/logging.rs"]
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
