// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Scanner screen: turns decode events into alerts.

use crate::screens::Alert;
use crate::services::scanner::{ScanOutcome, Scanner};

pub struct ScannerScreen {
    scanner: Scanner,
}

impl ScannerScreen {
    pub fn new(scanner: Scanner) -> Self {
        Self { scanner }
    }

    /// Whether the "Processing..." overlay is showing.
    pub fn is_processing(&self) -> bool {
        self.scanner.is_processing()
    }

    /// Handle a decoded code. Returns `None` when the scan was swallowed by
    /// the in-flight guard.
    pub async fn on_decode(&self, data: &str) -> Option<Alert> {
        match self.scanner.handle_scan(data).await {
            ScanOutcome::Ignored => None,
            outcome => Some(Alert::new(outcome.title(), outcome.message())),
        }
    }

    pub fn instructions(&self) -> &'static str {
        "Position the QR code within the frame"
    }
}
