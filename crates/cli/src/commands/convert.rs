use std::fs;
use std::path::Path;

use dealdesk_client::HttpRemoteOps;
use dealdesk_core::config::{AppConfig, LoadOptions, LogFormat};
use dealdesk_core::domain::company::CompanyFields;
use dealdesk_core::domain::customer::CustomerFields;
use dealdesk_core::domain::deal::DealId;
use dealdesk_core::draft::{DealDraft, OfferingMode};
use dealdesk_core::payload::{compose_create, compose_update, OfferingSelection};
use dealdesk_core::remote::RemoteOps;
use dealdesk_core::resolve::EntityReference;
use dealdesk_core::wizard::{ensure_complete, WizardStep};
use serde::Deserialize;

use super::CommandResult;

const COMMAND: &str = "convert";

/// A saved draft plus its entity-resolution outcome, as exported by the
/// console or written by hand for scripted conversions.
#[derive(Debug, Deserialize)]
struct ConvertFile {
    draft: DealDraft,
    #[serde(default)]
    existing_company_id: Option<String>,
    #[serde(default)]
    existing_customer_id: Option<String>,
    /// Present when the file describes an update of a prior deal.
    #[serde(default)]
    update_deal_id: Option<String>,
}

pub fn run(path: &Path) -> CommandResult {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "draft_file",
                format!("could not read `{}`: {error}", path.display()),
                2,
            );
        }
    };
    let file: ConvertFile = match serde_json::from_str(&raw) {
        Ok(file) => file,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "draft_file",
                format!("could not parse `{}`: {error}", path.display()),
                2,
            );
        }
    };

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(COMMAND, "configuration", error.to_string(), 2);
        }
    };
    init_logging(&config);

    for step in WizardStep::ALL {
        if let Err(error) = ensure_complete(step, &file.draft) {
            return CommandResult::failure(COMMAND, "validation", error.to_string(), 2);
        }
    }

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                2,
            );
        }
    };

    runtime.block_on(async { convert(&config, file).await })
}

async fn convert(config: &AppConfig, file: ConvertFile) -> CommandResult {
    let client = match HttpRemoteOps::new(&config.api) {
        Ok(client) => client,
        Err(error) => return CommandResult::failure(COMMAND, "integration", error.to_string(), 2),
    };
    let draft = file.draft;

    // Resolve the offering the same way the wizard would at submit time.
    let (quotes, catalog, categories, packages);
    let selection = match draft.mode {
        OfferingMode::Individual => {
            let (Some(region), Some(category)) =
                (draft.service_region.as_ref(), draft.category.as_ref())
            else {
                return CommandResult::failure(
                    COMMAND,
                    "validation",
                    "individual mode requires a region and category",
                    2,
                );
            };
            quotes = match client.quote_pricing(region, &draft.selected_service_ids).await {
                Ok(quotes) => quotes,
                Err(error) => {
                    return CommandResult::failure(COMMAND, "integration", error.to_string(), 2);
                }
            };
            catalog = client.list_services_by_category(category).await.unwrap_or_default();
            categories = client.list_service_categories().await.unwrap_or_default();
            OfferingSelection::Individual {
                quotes: &quotes,
                catalog: &catalog,
                category: categories
                    .iter()
                    .find(|record| &record.category_id == category),
            }
        }
        OfferingMode::Package => {
            let (Some(region), Some(package_id)) =
                (draft.service_region.as_ref(), draft.selected_package_id.as_ref())
            else {
                return CommandResult::failure(
                    COMMAND,
                    "validation",
                    "package mode requires a region and package",
                    2,
                );
            };
            packages = match client.list_packages(region).await {
                Ok(packages) => packages,
                Err(error) => {
                    return CommandResult::failure(COMMAND, "integration", error.to_string(), 2);
                }
            };
            let Some(offering) =
                packages.iter().find(|offering| &offering.package_id == package_id)
            else {
                return CommandResult::failure(
                    COMMAND,
                    "validation",
                    format!("package `{}` is not offered in the selected region", package_id.0),
                    2,
                );
            };
            OfferingSelection::Package {
                offering,
                cadence: draft.billing_cadence.unwrap_or_default(),
            }
        }
    };

    let receipt = if let Some(deal_id) = file.update_deal_id {
        let prior = match client.deal_detail(&DealId(deal_id)).await {
            Ok(prior) => prior,
            Err(error) => {
                return CommandResult::failure(COMMAND, "integration", error.to_string(), 2);
            }
        };
        let request = compose_update(&draft, &prior, selection);
        client.update_deal(&request).await
    } else {
        let company = match file.existing_company_id {
            Some(id) => EntityReference::Existing { id, fields: CompanyFields::default() },
            None => EntityReference::New { fields: CompanyFields::default() },
        };
        let customer = match file.existing_customer_id {
            Some(id) => EntityReference::Existing { id, fields: CustomerFields::default() },
            None => EntityReference::New { fields: CustomerFields::default() },
        };
        let request = compose_create(
            &draft,
            &company,
            &customer,
            selection,
            &config.session.identity(),
        );
        client.create_deal(&request).await
    };

    match receipt {
        Ok(receipt) if receipt.success => {
            let message = match receipt.deal_id {
                Some(deal_id) => format!("deal submitted: {}", deal_id.0),
                None => "deal submitted".to_string(),
            };
            CommandResult::success(COMMAND, message)
        }
        Ok(receipt) => CommandResult::failure(
            COMMAND,
            "submission",
            receipt.message.unwrap_or_else(|| "the submission was rejected".to_string()),
            1,
        ),
        Err(error) => CommandResult::failure(COMMAND, "integration", error.to_string(), 1),
    }
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    let result = match config.logging.format {
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .compact()
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .pretty()
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .json()
            .try_init(),
    };
    // A second init in the same process is harmless.
    let _ = result;
}
