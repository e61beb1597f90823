use clap::Parser;

use bionli_eval::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Args::parse();

	bionli_eval::run(args).await
}
