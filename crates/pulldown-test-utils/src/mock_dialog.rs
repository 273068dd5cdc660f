//! Mock panel editing dialog.

use std::sync::Arc;

use futures_lite::future::BoxedLocal;
use parking_lot::Mutex;
use pulldown::{EditorDialogHost, EditorError, PanelDescriptor};
use serde_json::Value;

/// Dialog host answering every request the same way.
#[derive(Debug, Clone)]
pub struct MockDialogHost {
    answer: Result<Option<Value>, EditorError>,
    opened_with: Arc<Mutex<Vec<Option<Value>>>>,
}

impl MockDialogHost {
    /// The user saves `descriptor`.
    pub fn saving(descriptor: Value) -> Self {
        Self::answering(Ok(Some(descriptor)))
    }

    /// The user closes the dialog without saving.
    pub fn dismissing() -> Self {
        Self::answering(Ok(None))
    }

    /// The dialog cannot be shown.
    pub fn failing(message: &str) -> Self {
        Self::answering(Err(EditorError::Dialog(message.to_string())))
    }

    fn answering(answer: Result<Option<Value>, EditorError>) -> Self {
        Self {
            answer,
            opened_with: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Descriptors the dialog was opened with, in order.
    pub fn opened_with(&self) -> Vec<Option<Value>> {
        self.opened_with.lock().clone()
    }
}

impl EditorDialogHost for MockDialogHost {
    fn edit_panel(
        &self,
        descriptor: Option<PanelDescriptor>,
    ) -> BoxedLocal<Result<Option<PanelDescriptor>, EditorError>> {
        self.opened_with
            .lock()
            .push(descriptor.map(PanelDescriptor::into_value));
        let answer = self.answer.clone().map(|saved| saved.map(PanelDescriptor::new));
        Box::pin(async move { answer })
    }
}
