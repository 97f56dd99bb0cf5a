//! Background image loading state.
//!
//! Every request gets a new generation. Only a completion carrying the latest
//! generation is accepted, so an older load that finishes late can never
//! replace the image the operator selected last. The last ready image stays
//! available while a new one loads or after a load fails.

#[cfg(test)]
#[path = "loader_test.rs"]
mod loader_test;

use crate::space::Size;

/// Handle for one load request, returned to whoever performs the fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
}

/// Coarse loader state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
}

/// An image that finished loading.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    pub src: String,
    pub size: Size,
}

#[derive(Debug, Clone, PartialEq)]
struct Pending {
    generation: u64,
    src: String,
}

#[derive(Debug, Default)]
pub struct ImageLoader {
    generation: u64,
    /// Cache key: the source most recently requested.
    requested: Option<String>,
    pending: Option<Pending>,
    ready: Option<LoadedImage>,
}

impl ImageLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request `src`. Returns `None` when it is already the requested source.
    pub fn request(&mut self, src: &str) -> Option<LoadTicket> {
        if self.requested.as_deref() == Some(src) {
            return None;
        }
        self.generation += 1;
        self.requested = Some(src.to_owned());
        self.pending = Some(Pending { generation: self.generation, src: src.to_owned() });
        tracing::debug!(generation = self.generation, %src, "image load requested");
        Some(LoadTicket { generation: self.generation })
    }

    /// Record a finished load. Returns false (and changes nothing) for a stale ticket.
    pub fn complete(&mut self, ticket: LoadTicket, size: Size) -> bool {
        let Some(pending) = self.take_current(ticket) else {
            tracing::warn!(generation = ticket.generation, latest = self.generation, "discarding stale image load");
            return false;
        };
        tracing::info!(generation = ticket.generation, src = %pending.src, width = size.width, height = size.height, "image ready");
        self.ready = Some(LoadedImage { src: pending.src, size });
        true
    }

    /// Record a failed load. The previous image, if any, stays ready.
    pub fn fail(&mut self, ticket: LoadTicket, reason: &str) -> bool {
        let Some(pending) = self.take_current(ticket) else {
            tracing::debug!(generation = ticket.generation, "ignoring failure of stale image load");
            return false;
        };
        tracing::warn!(src = %pending.src, %reason, "image load failed");
        // Allow the same source to be retried.
        self.requested = self.ready.as_ref().map(|r| r.src.clone());
        true
    }

    fn take_current(&mut self, ticket: LoadTicket) -> Option<Pending> {
        if self.pending.as_ref().is_some_and(|p| p.generation == ticket.generation) {
            self.pending.take()
        } else {
            None
        }
    }

    #[must_use]
    pub fn state(&self) -> LoadState {
        match (&self.pending, &self.ready) {
            (Some(_), _) => LoadState::Loading,
            (None, Some(_)) => LoadState::Ready,
            (None, None) => LoadState::Idle,
        }
    }

    /// The image to draw: the last one that finished loading.
    #[must_use]
    pub fn ready(&self) -> Option<&LoadedImage> {
        self.ready.as_ref()
    }

    /// Generation of the most recent request.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
