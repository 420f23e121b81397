//! Browser image loading behind the core `ImageSource` seam.
//!
//! `load` starts decoding an `<img>` and returns a handle immediately; the
//! renderer picks finished images out of the shared `TextureStore` and
//! uploads them. A panel shows its placeholder until then, and keeps it if
//! the image fails.

use stage_core::{ContentError, ContentHandle, ImageSource};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use web_sys as web;

pub struct PendingImage {
    pub handle: ContentHandle,
    pub element: web::HtmlImageElement,
}

#[derive(Default)]
pub struct TextureStore {
    pending: VecDeque<PendingImage>,
    released: Vec<ContentHandle>,
}

pub type SharedTextures = Rc<RefCell<TextureStore>>;

impl TextureStore {
    pub fn queue(&mut self, handle: ContentHandle, element: web::HtmlImageElement) {
        self.pending.push_back(PendingImage { handle, element });
    }

    /// Images that finished decoding. Broken images are logged and dropped.
    pub fn take_ready(&mut self) -> Vec<PendingImage> {
        let mut ready = Vec::new();
        let mut waiting = VecDeque::with_capacity(self.pending.len());
        while let Some(img) = self.pending.pop_front() {
            if !img.element.complete() {
                waiting.push_back(img);
            } else if img.element.natural_width() == 0 || img.element.natural_height() == 0 {
                log::warn!(
                    "[content] {} failed to decode; keeping placeholder",
                    img.element.src()
                );
            } else {
                ready.push(img);
            }
        }
        self.pending = waiting;
        ready
    }

    pub fn release(&mut self, handle: ContentHandle) {
        self.pending.retain(|p| p.handle != handle);
        self.released.push(handle);
    }

    pub fn take_released(&mut self) -> Vec<ContentHandle> {
        std::mem::take(&mut self.released)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.released.clear();
    }
}

pub struct WebImageSource {
    next: u64,
    store: SharedTextures,
}

impl WebImageSource {
    pub fn new(store: SharedTextures) -> Self {
        Self { next: 0, store }
    }
}

impl ImageSource for WebImageSource {
    fn load(&mut self, source: &str) -> Result<ContentHandle, ContentError> {
        if source.trim().is_empty() {
            return Err(ContentError::EmptySource);
        }
        let element = web::HtmlImageElement::new().map_err(|e| ContentError::Unavailable {
            source_url: source.to_string(),
            reason: format!("{:?}", e),
        })?;
        element.set_cross_origin(Some("anonymous"));
        element.set_src(source);
        self.next += 1;
        let handle = ContentHandle(self.next);
        self.store.borrow_mut().queue(handle, element);
        Ok(handle)
    }

    fn release(&mut self, handle: ContentHandle) {
        self.store.borrow_mut().release(handle);
    }
}
