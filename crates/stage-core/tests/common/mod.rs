// Recording fakes for the stage's host collaborators.

#![allow(dead_code)]

use glam::{Vec2, Vec3};
use stage_core::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default)]
pub struct RecordingRenderer {
    pub spawned: Vec<Vec2>,
    pub content: Vec<Option<ContentHandle>>,
    pub transforms: Vec<Transform>,
    pub resizes: Vec<Viewport>,
    pub renders: usize,
    pub releases: usize,
}

impl Renderer for RecordingRenderer {
    fn spawn_panel(&mut self, index: usize, native_size: Vec2) -> ObjectId {
        assert_eq!(index, self.spawned.len());
        self.spawned.push(native_size);
        self.content.push(None);
        self.transforms.push(Transform::IDENTITY);
        ObjectId(100 + index as u64)
    }

    fn set_content(&mut self, object: ObjectId, content: Option<ContentHandle>) {
        self.content[(object.0 - 100) as usize] = content;
    }

    fn set_transform(&mut self, object: ObjectId, transform: &Transform) {
        self.transforms[(object.0 - 100) as usize] = *transform;
    }

    fn resize(&mut self, viewport: &Viewport) {
        self.resizes.push(*viewport);
    }

    fn render(&mut self, _camera: &Camera) {
        self.renders += 1;
    }

    fn release(&mut self) {
        self.releases += 1;
    }
}

/// Loads anything except empty sources and sources containing "missing".
#[derive(Default)]
pub struct FakeImages {
    next: u64,
    pub loaded: Vec<String>,
    pub released: Vec<ContentHandle>,
}

impl ImageSource for FakeImages {
    fn load(&mut self, source: &str) -> Result<ContentHandle, ContentError> {
        if source.is_empty() {
            return Err(ContentError::EmptySource);
        }
        if source.contains("missing") {
            return Err(ContentError::Unavailable {
                source_url: source.to_string(),
                reason: "404".to_string(),
            });
        }
        self.next += 1;
        self.loaded.push(source.to_string());
        Ok(ContentHandle(self.next))
    }

    fn release(&mut self, handle: ContentHandle) {
        self.released.push(handle);
    }
}

pub struct CountingSubscription(pub Rc<Cell<u32>>);

impl Subscription for CountingSubscription {
    fn cancel(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

pub type Notifications = Rc<RefCell<Vec<(Option<usize>, Option<ScreenRect>)>>>;

pub fn recording_observer() -> (SelectionObserver, Notifications) {
    let log: Notifications = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    let observer: SelectionObserver = Box::new(move |index, bounds| {
        sink.borrow_mut().push((index, bounds));
    });
    (observer, log)
}

pub fn pages(n: usize) -> Vec<PanelContent> {
    (0..n)
        .map(|i| PanelContent::new(format!("pages/{i}.png")))
        .collect()
}

pub const VIEWPORT: Viewport = Viewport {
    left: 0.0,
    top: 0.0,
    width: 1280.0,
    height: 800.0,
};

pub fn build_stage(
    n: usize,
    config: StageConfig,
) -> (Stage<RecordingRenderer>, FakeImages, Notifications) {
    let mut images = FakeImages::default();
    let (observer, log) = recording_observer();
    let stage = Stage::new(
        RecordingRenderer::default(),
        &mut images,
        &pages(n),
        VIEWPORT,
        config,
        observer,
    )
    .expect("stage builds");
    (stage, images, log)
}

/// Screen position of a panel's live centre.
pub fn screen_center<R: Renderer>(stage: &Stage<R>, index: usize) -> Vec2 {
    let t = stage.panels().get(index).unwrap().transform.translation;
    project(stage, t)
}

pub fn project<R: Renderer>(stage: &Stage<R>, point: Vec3) -> Vec2 {
    project_world_to_screen(point, stage.camera().view_projection(), &stage.metrics().viewport)
        .unwrap()
}

/// Runs enough frames for every default-length tween to land.
pub fn settle<R: Renderer>(stage: &mut Stage<R>) {
    for _ in 0..30 {
        stage.tick(1.0 / 30.0);
    }
    stage.tick(1.0);
}
