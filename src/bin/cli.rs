use miette::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    search_table::cli::run().await?;
    Ok(())
}
