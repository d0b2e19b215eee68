use std::path::Path;

use thiserror::Error;

use crate::cache::RecordCache;
use crate::export::{self, ExportError, ExportOutcome};
use crate::form::RecordForm;
use crate::normalize::normalize;
use crate::record::Record;
use crate::render::{self, ListView, Renderer, Surface};
use crate::store::{Ack, RecordStore, StoreError};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("a submission is already in progress")]
    InFlight,

    #[error("failed to save record: {source}")]
    Store {
        #[source]
        source: StoreError,
    },
}

impl SubmitError {
    /// Blocking message shown to the user; the form keeps its values.
    pub fn alert(&self) -> String {
        match self {
            SubmitError::InFlight => "⏳ 이미 저장 중입니다. 잠시 후 다시 시도하세요.".to_string(),
            SubmitError::Store { source } => format!(
                "❌ 기록 저장에 실패했습니다. 저장소 로그를 확인하세요. ({source})"
            ),
        }
    }
}

/// Owns the record cache and the display region and sequences the load,
/// submit and export flows against the remote store.
///
/// Every operation takes `&mut self`, so one continuation always runs to
/// completion before the next one can touch the cache or the view.
pub struct Session<S: Surface> {
    store: RecordStore,
    cache: RecordCache,
    renderer: Renderer<S>,
}

impl<S: Surface> Session<S> {
    pub fn new(store: RecordStore, surface: S) -> Self {
        Self {
            store,
            cache: RecordCache::new(),
            renderer: Renderer::new(surface),
        }
    }

    /// Fetches, normalizes and caches the record set, then renders it.
    /// Failures end up in the view; the cache keeps its previous contents.
    pub async fn load(&mut self) {
        self.renderer.render_loading();
        match self.store.fetch_all().await {
            Ok(records) => {
                self.cache.replace(normalize(records));
                self.renderer.render_all(self.cache.current());
            }
            Err(e) => {
                tracing::error!(error = %e, kind = ?e.kind(), "failed to load records");
                self.renderer.render_error(render::load_failure_notice(&e));
            }
        }
    }

    /// Sends the form as a new record. On success the form is reset and the
    /// list is reloaded from the store; nothing is inserted locally.
    pub async fn submit(&mut self, form: &mut RecordForm) -> Result<Ack, SubmitError> {
        if !form.control.try_begin() {
            return Err(SubmitError::InFlight);
        }
        let payload = form.payload();
        let result = self.store.append(&payload).await;
        form.control.finish();

        match result {
            Ok(ack) => {
                tracing::info!("record saved, refreshing list");
                form.reset();
                self.load().await;
                Ok(ack)
            }
            Err(source) => {
                tracing::error!(error = %source, kind = ?source.kind(), "failed to submit record");
                Err(SubmitError::Store { source })
            }
        }
    }

    /// Exports the cached records. Never fetches.
    pub fn export(&self, dir: &Path) -> Result<ExportOutcome, ExportError> {
        export::export_to_spreadsheet(self.cache.current(), dir)
    }

    pub fn records(&self) -> &[Record] {
        self.cache.current()
    }

    pub fn view(&self) -> &ListView {
        self.renderer.view()
    }

    pub fn surface(&self) -> &S {
        self.renderer.surface()
    }
}
