use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

pub const FALLBACK_MESSAGE: &str = "Error occurred! Try reloading or you can try again";

/// Catches panics raised while building a view. Once tripped it stays in the
/// fallback state for the rest of the session.
#[derive(Debug, Default)]
pub struct ErrorBoundary {
    has_error: bool,
}

impl ErrorBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    /// Runs `build` unless the boundary already tripped. `None` means the
    /// caller should draw [`FALLBACK_MESSAGE`] instead.
    pub fn guard<T>(&mut self, build: impl FnOnce() -> T) -> Option<T> {
        if self.has_error {
            return None;
        }
        match panic::catch_unwind(AssertUnwindSafe(build)) {
            Ok(view) => Some(view),
            Err(payload) => {
                self.has_error = true;
                let timestamp = chrono::Local::now().format("%H:%M:%S--%d/%m/%Y");
                tracing::error!(
                    fault = panic_message(payload.as_ref()),
                    %timestamp,
                    "render fault, showing fallback"
                );
                None
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}
