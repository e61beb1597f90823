use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = bionli_api::Args::parse();

	bionli_api::run(args).await
}
