use std::sync::{Arc, Mutex};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::QuestionImportUseCase;
use crate::domain::error::Result;
use crate::infrastructure::config::ImporterConfig;
use crate::infrastructure::registry::{CatalogRegistry, QuestionTypeRegistry};
use crate::infrastructure::submission::build_submitter;
use crate::interfaces::http::{add_log, start_server};

pub fn run() {
    let config = match ImporterConfig::load() {
        Ok(config) => config,
        Err(err) => {
            let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();
            error!(error = %err, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .try_init();

    if let Err(err) = actix_web::rt::System::new().block_on(serve(config)) {
        error!(error = %err, "Importer service stopped");
        std::process::exit(1);
    }
}

async fn serve(config: ImporterConfig) -> Result<()> {
    let registry: Arc<dyn QuestionTypeRegistry> =
        Arc::new(CatalogRegistry::with_aliases(&config.registry.extra_aliases));
    let submitter = build_submitter(&config.storage).await?;
    let import_use_case = Arc::new(QuestionImportUseCase::new(
        registry,
        submitter,
        config.import.clone(),
    ));

    let logs = Arc::new(Mutex::new(Vec::new()));
    let server = start_server(import_use_case, logs.clone(), &config.server)?;

    let (host, port) = config.bind_address();
    info!(host = %host, port, "Importer API listening");
    add_log(
        &logs,
        "INFO",
        "Server",
        &format!("Listening on http://{}:{}/api", host, port),
    );

    server.await?;
    Ok(())
}
