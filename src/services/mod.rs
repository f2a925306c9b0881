// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - API access, credential storage and scan dispatch.

pub mod api;
pub mod credentials;
pub mod scanner;
pub mod seal;

pub use api::{ApiClient, AuthHeader, LoginResponse, ScanResponse};
pub use credentials::{CredentialStore, FileStorage, MemoryStorage, SecureStorage, StoredCredentials};
pub use scanner::{ScanCode, ScanOutcome, Scanner};
pub use seal::DeviceKey;
