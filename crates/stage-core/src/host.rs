//! Seams to the collaborators the stage drives but does not own: the
//! renderer, the image loader and the host's event subscriptions.

use crate::camera::Camera;
use crate::error::ContentError;
use crate::geometry::{ScreenRect, Viewport};
use crate::panel::Transform;
use glam::Vec2;

/// Renderer-side identity of a panel object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u64);

/// Opaque handle to loaded visual content (a texture, an image, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContentHandle(pub u64);

/// Scene owner and frame presenter.
pub trait Renderer {
    /// Creates the scene object for panel `index` with its native size.
    fn spawn_panel(&mut self, index: usize, native_size: Vec2) -> ObjectId;
    /// Binds content to an object; `None` shows the placeholder surface.
    fn set_content(&mut self, object: ObjectId, content: Option<ContentHandle>);
    fn set_transform(&mut self, object: ObjectId, transform: &Transform);
    fn resize(&mut self, viewport: &Viewport);
    fn render(&mut self, camera: &Camera);
    /// Frees every GPU resource. Called once from `Stage::destroy`.
    fn release(&mut self);
}

/// Loads content for panels. Loading may finish after `load` returns; the
/// handle is valid immediately and renders as a placeholder until ready.
pub trait ImageSource {
    fn load(&mut self, source: &str) -> Result<ContentHandle, ContentError>;
    /// Content no panel refers to any more.
    fn release(&mut self, _handle: ContentHandle) {}
}

/// A registration with the host (event listener, resize observer, ...) that
/// the stage tears down in `destroy`.
pub trait Subscription {
    fn cancel(&mut self);
}

/// Receives `(selected index, screen bounds)` after every selection change;
/// `(None, None)` on deselect.
pub type SelectionObserver = Box<dyn FnMut(Option<usize>, Option<ScreenRect>)>;
