// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::storage::CommexDatabase;

/// Shared handler state. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    db: Arc<CommexDatabase>,
}

impl AppState {
    pub fn new(db: CommexDatabase) -> Self {
        Self { db: Arc::new(db) }
    }

    pub fn db(&self) -> &CommexDatabase {
        &self.db
    }
}
