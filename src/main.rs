use anyhow::{bail, Context};
use clap::Parser;
use study_progress::utils::{logger, validation::Validate};
use study_progress::{CliConfig, DashboardCli, DashboardConfig, JsonFileStore, ProgramStore};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    let config = DashboardConfig::from_optional_file(&cli.config)
        .with_context(|| format!("Failed to load config file '{}'", cli.config.display()))?;
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        bail!("{}", e.user_friendly_message());
    }

    let data_path = config.resolve_data_path(cli.data.as_deref());
    if !data_path.exists() {
        bail!("Data file not found: {}", data_path.display());
    }

    let store = JsonFileStore::new(&data_path);
    let program = store.load().map_err(|e| {
        tracing::error!("Loading {} failed: {} ({:?})", data_path.display(), e, e.kind());
        anyhow::anyhow!(e.user_friendly_message())
    })?;

    println!("Hint: enter '0' at any prompt to cancel the current action and return to the menu.\n");

    let stdin = std::io::stdin();
    let mut dashboard =
        DashboardCli::new(program, store, stdin.lock(), std::io::stdout()).with_config(&config);
    dashboard.run().context("Dashboard session failed")?;

    Ok(())
}
