use clap::Parser;
use minifs::shell::{start_shell, ClientArgs};

fn main() -> anyhow::Result<()> {
    let args = ClientArgs::parse();
    start_shell(&args)
}
