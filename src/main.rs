#[tokio::main]
async fn main() -> anyhow::Result<()> {
    wtplatform_api::cli::run_with_sys_args().await
}
