use clap::Parser;
use magnetpnp::cli::{self, Cli};
use magnetpnp::init_logging;

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    cli::run(cli, &mut stdout.lock())
}
