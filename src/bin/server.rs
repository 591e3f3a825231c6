//! Portal server binary.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use shebang::api::{self, Config};

#[derive(Parser)]
#[command(name = "shebang-portal")]
#[command(author, version, about = "Shebang! development portal", long_about = None)]
struct Cli {
    /// Host address to bind to (default: SHEBANG_HOST or 127.0.0.1)
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on (default: SHEBANG_PORT or 8080)
    #[arg(short, long)]
    port: Option<u16>,

    /// Portal root holding docs/, web/, projects/ and templates/
    /// (default: SHEBANG_ROOT or the current directory)
    #[arg(long)]
    root: Option<PathBuf>,
}

impl Cli {
    /// Apply CLI flags over the environment-derived configuration.
    fn into_config(self) -> Config {
        let mut config = Config::new();
        if let Some(host) = self.host {
            config = config.with_host(host);
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(root) = self.root {
            config = config.with_root(root);
        }
        config
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let config = Cli::parse().into_config();
    api::run(config).await?;
    Ok(())
}
