// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models exchanged with the volunteer API.

pub mod attendance;
pub mod event;
pub mod user;
pub mod wire;

pub use attendance::Attendance;
pub use event::Event;
pub use user::{Profile, Session, User};
pub use wire::Id;
