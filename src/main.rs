//! mackerel-plugin-chocon entry point.

use chocon_plugin::cli::{self, Cli};
use chocon_plugin::core::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    cli::execute(cli).await
}
