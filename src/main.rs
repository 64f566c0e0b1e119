/*
 * Responsibility
 * - tokio runtime startup
 * - call app::run() (no logic here)
 */
use anyhow::Result;

mod app;
mod config;

#[tokio::main]
async fn main() -> Result<()> {
    app::run().await
}
