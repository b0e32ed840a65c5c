#[path = "autotemp/app.rs"]
mod app;
#[path = "autotemp/args.rs"]
mod args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
