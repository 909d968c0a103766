use crate::error::Result;
use crate::models::file::FilePayload;
use crate::services::ports::UploadApi;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Holds the URL of an uploaded asset (a question diagram).
///
/// Uploads are not sequenced: if two are in flight, the one whose response
/// arrives last overwrites the other, whatever order they were started in.
#[derive(Clone, Default)]
pub struct UploadSlot {
    value: Arc<Mutex<String>>,
    in_flight: Arc<AtomicUsize>,
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl UploadSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> String {
        self.value
            .lock()
            .map(|v| v.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn set(&self, url: &str) {
        let mut guard = self
            .value
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = url.to_string();
    }

    pub fn clear(&self) {
        self.set("");
    }

    pub fn is_uploading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn upload(&self, api: &dyn UploadApi, file: FilePayload) -> Result<String> {
        file.ensure_image()?;
        let _guard = InFlight::enter(&self.in_flight);
        let url = api.upload(file).await?;
        self.set(&url);
        Ok(url)
    }
}
