// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Ports shared between entities.
//!
//! A controller owns its `control_write` port through a [`SharedPort`] and
//! hands consumers a [`PortView`]. The view has no write access, so a consumer
//! entity cannot mutate state it does not own.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Owning, writable handle to a shared port.
#[derive(Debug)]
pub struct SharedPort<T> {
    name: String,
    inner: Arc<RwLock<T>>,
}

/// Read-only handle to a port owned by another entity.
#[derive(Debug)]
pub struct PortView<T> {
    name: String,
    inner: Arc<RwLock<T>>,
}

impl<T> SharedPort<T> {
    pub fn new(name: &str, value: T) -> Self {
        Self {
            name: name.to_string(),
            inner: Arc::new(RwLock::new(value)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn view(&self) -> PortView<T> {
        PortView {
            name: self.name.clone(),
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> PortView<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> PortView<T> {
    pub fn snapshot(&self) -> T {
        self.read().clone()
    }
}

impl<T> Clone for PortView<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}
