/*!
Standalone bridge: one shared desktop served to browser front ends.

```text
DESKSHELL_PORT=3030 RUST_LOG=deskshell=debug deskshell-ws [config.json]
```
*/

use anyhow::{Context, Result};
use deskshell::{DeskConfig, Desktop, Launcher};
use deskshell_ws::{start_server, RemoteContent, WebSocketState, DEFAULT_WS_PORT};

fn load_config(path: Option<String>) -> Result<DeskConfig> {
  let Some(path) = path else {
    return Ok(DeskConfig::default());
  };
  let json = std::fs::read_to_string(&path).with_context(|| format!("reading config {path}"))?;
  DeskConfig::from_json(&json).with_context(|| format!("parsing config {path}"))
}

#[tokio::main]
async fn main() -> Result<()> {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  let config = load_config(std::env::args().nth(1))?;
  let port = std::env::var("DESKSHELL_PORT")
    .ok()
    .and_then(|p| p.parse().ok())
    .unwrap_or(DEFAULT_WS_PORT);

  // The front end reports its real viewport with `set_viewport` on connect.
  let desktop = Desktop::builder()
    .config(config)
    .build()
    .context("building desktop")?;
  let launcher = Launcher::with_portfolio_apps(RemoteContent::factory());
  log::info!("deskshell: {} apps registered", launcher.icons().len());

  start_server(WebSocketState::with_port(desktop, launcher, port))
    .await
    .with_context(|| format!("serving on port {port}"))?;
  Ok(())
}
