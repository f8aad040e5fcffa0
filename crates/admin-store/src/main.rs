use admin_store::model::{ReceivableFilters, ReceivableStatus, TemplateFilters};
use admin_store::{AdminStore, AppConfig};
use resource_slice::telemetry::setup_tracing;
use resource_slice::{PageRequest, Settled, SliceClient};
use tracing::{error, info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = AppConfig::load().map_err(|e| e.to_string())?;
    info!(path = %AppConfig::config_path().display(), "Configuration loaded");

    let admin = AdminStore::from_config(&config).map_err(|e| e.to_string())?;

    // Report every settled list as it lands
    let listener = admin.listen(|state| {
        let receivables = &state.receivables;
        if !receivables.loading() {
            info!(
                items = receivables.items().len(),
                total = receivables.pagination().total_results,
                "Receivables snapshot"
            );
        }
    });

    let span = tracing::info_span!("overdue_receivables");
    let overdue = async {
        let filters = ReceivableFilters {
            status: Some(ReceivableStatus::Overdue),
            ..Default::default()
        };
        admin
            .receivables
            .slice()
            .list(filters, PageRequest::first(config.pagination.default_page_size))
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    match overdue {
        Settled::Applied(pagination) => {
            info!(total = pagination.total_results, "Overdue receivables listed")
        }
        Settled::Rejected(e) => error!(error = %e.message, code = ?e.code, "Listing failed"),
        Settled::Superseded => warn!("Listing superseded"),
    }

    let span = tracing::info_span!("templates");
    let templates = async {
        admin
            .templates
            .slice()
            .set_filters(TemplateFilters::default())
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;
    if let Settled::Rejected(e) = templates {
        error!(error = %e.message, "Template listing failed");
    }

    let state = admin.state();
    info!(
        receivables = state.receivables.items().len(),
        templates = state.templates.items().len(),
        "Final state"
    );

    listener.unsubscribe();
    admin.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
