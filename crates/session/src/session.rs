//! One editing session: the four documents, the preview and the export path.
//!
//! Every document lives behind its own lock. Edits take the write lock for the
//! duration of one command; previews and exports read a snapshot under the
//! read lock and release it before any rendering starts.

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;

use docforge_core::{Aggregate, AggregateRoot, DocumentCommand, DocumentEvent};
use docforge_export::{
    DocumentEncoder, DocumentPayload, ExportError, ExportFormat, ExportResult, PdfBackend, Project,
    WorkbookEncoder, XlsxBackend, export_filename, quotation_text, random_suffix,
};
use docforge_invoicing::{DeliveryNote, DeliveryNoteField, DeliveryNoteItemField};
use docforge_sales::{Quotation, QuotationField, QuotationItemField};
use docforge_statements::{Statement, StatementField, TransactionField};
use docforge_warehouse::{PackageDimensionField, WarehouseReceipt, WarehouseReceiptField};

use crate::artifact::{BusyGuard, ExportArtifact, ExportOutcome, stage};
use crate::config::SessionConfig;
use crate::edit::{DocumentType, EditEvent, UiAction};
use crate::error::SessionError;

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Execute one command against a document and log what it changed.
fn run<A, H, F, I, HC, IC>(
    lock: &RwLock<A>,
    document: DocumentType,
    command: &DocumentCommand<H, F>,
) where
    A: Aggregate<
            Command = DocumentCommand<H, F>,
            Event = DocumentEvent<I, HC, IC>,
            Error = Infallible,
        >,
{
    let mut state = write(lock);
    let Ok(events) = state.execute(command);
    if events.is_empty() {
        tracing::debug!(%document, "command left document unchanged");
    }
    for event in &events {
        tracing::debug!(
            %document,
            event_type = event.event_type(),
            version = state.version(),
            "document changed"
        );
    }
}

pub struct Session {
    config: SessionConfig,
    today: NaiveDate,
    delivery_note: RwLock<DeliveryNote>,
    quotation: RwLock<Quotation>,
    statement: RwLock<Statement>,
    warehouse_receipt: RwLock<WarehouseReceipt>,
    exporting: AtomicBool,
    pdf: Arc<dyn DocumentEncoder>,
    xlsx: Arc<dyn WorkbookEncoder>,
}

impl Session {
    /// Fresh documents dated with the local calendar day.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_today(config, chrono::Local::now().date_naive())
    }

    pub fn with_today(config: SessionConfig, today: NaiveDate) -> Self {
        let issuer = &config.issuer;
        let session = Self {
            delivery_note: RwLock::new(DeliveryNote::new(issuer, today)),
            quotation: RwLock::new(Quotation::new(issuer, today)),
            statement: RwLock::new(Statement::new(issuer, today)),
            warehouse_receipt: RwLock::new(WarehouseReceipt::new(issuer, today)),
            exporting: AtomicBool::new(false),
            pdf: Arc::new(PdfBackend),
            xlsx: Arc::new(XlsxBackend),
            today,
            config,
        };
        tracing::info!(%today, issuer = %session.config.issuer.name, "session started");
        session
    }

    /// Swap the byte encoders, e.g. for a failing one in tests.
    pub fn with_encoders(
        mut self,
        pdf: Arc<dyn DocumentEncoder>,
        xlsx: Arc<dyn WorkbookEncoder>,
    ) -> Self {
        self.pdf = pdf;
        self.xlsx = xlsx;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::Acquire)
    }

    pub fn delivery_note(&self) -> DeliveryNote {
        read(&self.delivery_note).clone()
    }

    pub fn quotation(&self) -> Quotation {
        read(&self.quotation).clone()
    }

    pub fn statement(&self) -> Statement {
        read(&self.statement).clone()
    }

    pub fn warehouse_receipt(&self) -> WarehouseReceipt {
        read(&self.warehouse_receipt).clone()
    }

    /// Apply one field edit. Unknown field names are rejected and leave the
    /// document untouched; bad values are coerced by the document itself.
    pub fn apply_edit(&self, edit: &EditEvent) -> Result<(), SessionError> {
        let document = edit.document;
        match document {
            DocumentType::DeliveryNote => run(
                &self.delivery_note,
                document,
                &edit.command::<DeliveryNoteField, DeliveryNoteItemField>()?,
            ),
            DocumentType::Quotation => run(
                &self.quotation,
                document,
                &edit.command::<QuotationField, QuotationItemField>()?,
            ),
            DocumentType::Statement => run(
                &self.statement,
                document,
                &edit.command::<StatementField, TransactionField>()?,
            ),
            DocumentType::WarehouseReceipt => run(
                &self.warehouse_receipt,
                document,
                &edit.command::<WarehouseReceiptField, PackageDimensionField>()?,
            ),
        }
        Ok(())
    }

    pub fn add_item(&self, document: DocumentType) {
        match document {
            DocumentType::DeliveryNote => {
                run(&self.delivery_note, document, &DocumentCommand::AddItem)
            }
            DocumentType::Quotation => run(&self.quotation, document, &DocumentCommand::AddItem),
            DocumentType::Statement => run(&self.statement, document, &DocumentCommand::AddItem),
            DocumentType::WarehouseReceipt => {
                run(&self.warehouse_receipt, document, &DocumentCommand::AddItem)
            }
        }
    }

    /// Out-of-range indices are ignored.
    pub fn remove_item(&self, document: DocumentType, index: usize) {
        match document {
            DocumentType::DeliveryNote => {
                run(&self.delivery_note, document, &DocumentCommand::RemoveItem { index })
            }
            DocumentType::Quotation => {
                run(&self.quotation, document, &DocumentCommand::RemoveItem { index })
            }
            DocumentType::Statement => {
                run(&self.statement, document, &DocumentCommand::RemoveItem { index })
            }
            DocumentType::WarehouseReceipt => {
                run(&self.warehouse_receipt, document, &DocumentCommand::RemoveItem { index })
            }
        }
    }

    pub fn dispatch(&self, action: UiAction) -> Result<(), SessionError> {
        match action {
            UiAction::Edit(edit) => self.apply_edit(&edit),
            UiAction::AddItem { document } => {
                self.add_item(document);
                Ok(())
            }
            UiAction::RemoveItem { document, index } => {
                self.remove_item(document, index);
                Ok(())
            }
        }
    }

    /// What the live preview shows; identical to what an export encodes.
    pub fn preview(&self, document: DocumentType) -> DocumentPayload {
        match document {
            DocumentType::DeliveryNote => read(&self.delivery_note).project(self.today),
            DocumentType::Quotation => read(&self.quotation).project(self.today),
            DocumentType::Statement => read(&self.statement).project(self.today),
            DocumentType::WarehouseReceipt => read(&self.warehouse_receipt).project(self.today),
        }
    }

    pub fn preview_json(&self, document: DocumentType) -> serde_json::Result<String> {
        self.preview(document).to_json()
    }

    /// Quotation as plain text, for the clipboard.
    pub fn copy_quotation_text(&self) -> String {
        quotation_text(&read(&self.quotation))
    }

    /// Export the current state of `document`. Never panics and never
    /// touches document state; failures come back as [`ExportOutcome::Failed`].
    pub async fn export(&self, document: DocumentType, format: ExportFormat) -> ExportOutcome {
        match self.try_export(document, format).await {
            Ok(artifact) => ExportOutcome::Ready(artifact),
            Err(err) => {
                tracing::error!(%document, %format, error = %err, "export failed");
                ExportOutcome::Failed {
                    message: err.to_string(),
                }
            }
        }
    }

    pub async fn try_export(
        &self,
        document: DocumentType,
        format: ExportFormat,
    ) -> ExportResult<ExportArtifact> {
        let _busy = BusyGuard::acquire(&self.exporting)?;

        let payload = self.preview(document);
        let filename = export_filename(payload.kind, &payload.number, &random_suffix(), format);
        let version = payload.version;

        let pdf = Arc::clone(&self.pdf);
        let xlsx = Arc::clone(&self.xlsx);
        let bytes = tokio::task::spawn_blocking(move || {
            docforge_export::encode(&payload, format, pdf.as_ref(), xlsx.as_ref())
        })
        .await
        .map_err(|err| ExportError::Task(err.to_string()))??;

        let bytes = match &self.config.staging_dir {
            Some(dir) => stage(dir, &filename, bytes).await?,
            None => bytes,
        };

        tracing::info!(
            %document,
            %format,
            filename = %filename,
            version,
            bytes = bytes.len(),
            "export ready"
        );
        Ok(ExportArtifact {
            filename,
            content_type: format.content_type().to_string(),
            bytes,
        })
    }
}
