use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = kalk_api::Args::parse();

	kalk_api::run(args).await
}
