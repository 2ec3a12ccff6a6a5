use std::io::{self, Write};

use anyhow::Result;
use tracing::{info, warn};

use historyview::{collect, config, logging, report};

fn main() -> Result<()> {
    logging::init_logging();

    let cwd = std::env::current_dir().unwrap_or_else(|_| ".".into());
    let cfg = match config::load_config(config::local_config_path(&cwd).as_deref()) {
        Ok(loaded) => {
            if let Some(path) = &loaded.source {
                info!("loaded config from {}", path.display());
            }
            loaded.config
        }
        Err(err) => {
            warn!("{err:#}; using defaults");
            config::load_config(None)?.config
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::write_banner(&mut out)?;

    let ctx = collect::RunContext::current(cwd);
    collect::run(&mut out, &ctx, &cfg)?;
    out.flush()?;

    info!("historyview run finished");
    Ok(())
}
