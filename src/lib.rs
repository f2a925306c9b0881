// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Sukarela volunteer client.
//!
//! Lets volunteers sign in, browse upcoming and attended events, and record
//! attendance by scanning an event QR code.

pub mod config;
pub mod error;
pub mod models;
pub mod screens;
pub mod services;

use std::sync::Arc;

use config::Config;
use error::Result;
use screens::{AttendedScreen, HomeScreen, LoginScreen, Route, ScannerScreen, UpcomingScreen};
use services::{ApiClient, CredentialStore, FileStorage, Scanner, SecureStorage};

/// Shared client state: one API client and the credential store that feeds
/// its auth header.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    pub store: CredentialStore,
}

impl AppState {
    /// Build state backed by the sealed file store in `config.state_dir`.
    pub fn new(config: Config) -> Result<Self> {
        let storage = FileStorage::open(&config.state_dir)?;
        Self::with_storage(config, Arc::new(storage))
    }

    /// Build state over any storage backend.
    pub fn with_storage(config: Config, storage: Arc<dyn SecureStorage>) -> Result<Self> {
        let api = ApiClient::new(&config)?;
        let store = CredentialStore::new(storage, api.auth().clone());
        Ok(Self { config, api, store })
    }

    /// Where the app opens.
    pub fn startup_route(&self) -> Route {
        screens::startup_route(&self.store)
    }

    pub fn login_screen(&self) -> LoginScreen {
        LoginScreen::new(self.api.clone(), self.store.clone())
    }

    pub fn home_screen(&self) -> HomeScreen {
        HomeScreen::new(self.api.clone(), self.store.clone())
    }

    pub fn upcoming_screen(&self) -> UpcomingScreen {
        UpcomingScreen::new(self.api.clone(), self.store.clone())
    }

    pub fn attended_screen(&self) -> AttendedScreen {
        AttendedScreen::new(self.api.clone(), self.store.clone())
    }

    pub fn scanner_screen(&self) -> ScannerScreen {
        ScannerScreen::new(Scanner::new(
            self.api.clone(),
            self.store.clone(),
            self.config.scan_debounce,
        ))
    }
}
