use std::path::{Path, PathBuf};
use std::process::ExitCode;

use docforge_export::ExportFormat;
use docforge_session::{DocumentType, ExportOutcome, Session, SessionConfig, UiAction};

const USAGE: &str =
    "usage: docforge <delivery_note|quotation|statement|warehouse_receipt> <pdf|xlsx> [actions.json]";

fn parse_format(raw: &str) -> Option<ExportFormat> {
    match raw {
        "pdf" => Some(ExportFormat::Pdf),
        "xlsx" => Some(ExportFormat::Xlsx),
        _ => None,
    }
}

async fn load_actions(path: &Path) -> Result<Vec<UiAction>, String> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|err| format!("invalid actions in {}: {err}", path.display()))
}

#[tokio::main]
async fn main() -> ExitCode {
    docforge_observability::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (Some(document), Some(format)) = (args.first(), args.get(1)) else {
        tracing::error!("{USAGE}");
        return ExitCode::FAILURE;
    };
    let document = match document.parse::<DocumentType>() {
        Ok(document) => document,
        Err(err) => {
            tracing::error!(error = %err, "{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    let Some(format) = parse_format(format) else {
        tracing::error!(format = %format, "{USAGE}");
        return ExitCode::FAILURE;
    };

    let session = Session::new(SessionConfig::from_env());

    if let Some(path) = args.get(2).map(PathBuf::from) {
        let actions = match load_actions(&path).await {
            Ok(actions) => actions,
            Err(message) => {
                tracing::error!("{message}");
                return ExitCode::FAILURE;
            }
        };
        for action in actions {
            if let Err(err) = session.dispatch(action) {
                tracing::warn!(error = %err, "action skipped");
            }
        }
    }

    match session.export(document, format).await {
        ExportOutcome::Ready(artifact) => {
            if let Err(err) = tokio::fs::write(&artifact.filename, &artifact.bytes).await {
                tracing::error!(
                    filename = %artifact.filename,
                    error = %err,
                    "failed to write export"
                );
                return ExitCode::FAILURE;
            }
            tracing::info!(filename = %artifact.filename, "written");
            ExitCode::SUCCESS
        }
        ExportOutcome::Failed { .. } => ExitCode::FAILURE,
    }
}
