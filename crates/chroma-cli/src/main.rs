#![forbid(unsafe_code)]

use chroma_cli::{Cli, init_logging, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.log_level())?;

    let stdout = std::io::stdout();
    run(&cli, &mut stdout.lock())
}
