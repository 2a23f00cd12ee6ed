//! Fixed-capacity window registry
//!
//! Insertion order is paint order: later entries are drawn on top and
//! updated later. Removal shifts the tail down so that order survives.

use alloc::vec::Vec;

use crate::error::{QarmaError, Result};
use crate::window::{Window, WindowId};

pub struct WindowRegistry {
    windows: Vec<Window>,
    capacity: usize,
}

impl WindowRegistry {
    pub fn new(capacity: usize) -> Self {
        Self { windows: Vec::with_capacity(capacity), capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.windows.len() >= self.capacity
    }

    /// Append `window`. When full, the window comes back with the error
    /// and existing entries are left as they were.
    pub fn add(&mut self, window: Window) -> core::result::Result<WindowId, (QarmaError, Window)> {
        if self.is_full() {
            return Err((QarmaError::RegistryFull { capacity: self.capacity }, window));
        }
        let id = window.id();
        self.windows.push(window);
        Ok(id)
    }

    fn position(&self, id: WindowId) -> Option<usize> {
        self.windows.iter().position(|w| w.id() == id)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.position(id).is_some()
    }

    /// Take the window out, keeping the others in order.
    pub fn remove(&mut self, id: WindowId) -> Result<Window> {
        let index = self.position(id).ok_or(QarmaError::WindowNotFound(id))?;
        Ok(self.windows.remove(index))
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id() == id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.id() == id)
    }

    pub fn get_index_mut(&mut self, index: usize) -> Option<&mut Window> {
        self.windows.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Window> {
        self.windows.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Window> {
        self.windows.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.windows.iter().map(|w| w.id())
    }

    /// Empty the registry, newest window first.
    pub fn drain(&mut self) -> impl Iterator<Item = Window> + '_ {
        self.windows.drain(..).rev()
    }
}
