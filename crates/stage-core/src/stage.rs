//! The stage: panels, selection, layout and transitions behind one handle.
//!
//! All mutation happens through `&mut self` on the host's UI thread in
//! response to clicks, resizes and frame ticks. Nothing is cached across
//! those events; picking and layout always read the live state.

use crate::camera::Camera;
use crate::config::{LayoutMode, ResizeBehavior, StageConfig, TransitionTiming};
use crate::error::StageError;
use crate::geometry::{project_world_to_screen, ScreenRect, Viewport};
use crate::hit::resolve_hit;
use crate::host::{ContentHandle, ImageSource, Renderer, SelectionObserver, Subscription};
use crate::layout::{compute_target_transforms, LayoutDepths};
use crate::metrics::StageMetrics;
use crate::panel::{PanelContent, PanelRegistry, Transform};
use crate::selection::{Selection, SelectionChange, SelectionMachine};
use crate::transition::{apply_channel, TransitionDriver};
use crate::tween::{TweenEngine, Tweener};
use glam::Vec2;

pub struct Stage<R: Renderer, T: Tweener = TweenEngine> {
    config: StageConfig,
    panels: PanelRegistry,
    selection: SelectionMachine,
    metrics: StageMetrics,
    camera: Camera,
    targets: Vec<Transform>,
    driver: TransitionDriver,
    renderer: R,
    tweener: T,
    observer: SelectionObserver,
    subscriptions: Vec<Box<dyn Subscription>>,
    destroyed: bool,
}

impl<R: Renderer> Stage<R, TweenEngine> {
    pub fn new(
        renderer: R,
        images: &mut dyn ImageSource,
        contents: &[PanelContent],
        viewport: Viewport,
        config: StageConfig,
        observer: SelectionObserver,
    ) -> Result<Self, StageError> {
        Self::with_tweener(
            renderer,
            TweenEngine::new(),
            images,
            contents,
            viewport,
            config,
            observer,
        )
    }
}

impl<R: Renderer, T: Tweener> Stage<R, T> {
    /// Builds every panel at its resting slot. Fails fast on configuration
    /// errors; content that fails to load leaves a placeholder.
    pub fn with_tweener(
        mut renderer: R,
        tweener: T,
        images: &mut dyn ImageSource,
        contents: &[PanelContent],
        viewport: Viewport,
        config: StageConfig,
        observer: SelectionObserver,
    ) -> Result<Self, StageError> {
        if contents.is_empty() {
            return Err(StageError::EmptyContent);
        }
        config.validate()?;
        let metrics = StageMetrics::derive(viewport, &config)?;
        for (index, content) in contents.iter().enumerate() {
            if let Some(size) = content.native_size {
                if !(size.x > 0.0 && size.y > 0.0) {
                    return Err(StageError::InvalidPanelSize {
                        index,
                        width: size.x,
                        height: size.y,
                    });
                }
            }
        }

        renderer.resize(&viewport);
        let mut panels = PanelRegistry::new();
        for (index, content) in contents.iter().enumerate() {
            let native_size = content
                .native_size
                .unwrap_or(config.layout.default_panel_size);
            let object = renderer.spawn_panel(index, native_size);
            let handle = load_content(images, index, &content.source);
            renderer.set_content(object, handle);
            panels.push(
                object,
                content.source.clone(),
                handle,
                native_size,
                Transform::IDENTITY,
            );
        }

        let camera = Camera::from_config(&config.camera, metrics.aspect);
        let mut stage = Self {
            driver: TransitionDriver::new(config.timing),
            config,
            panels,
            selection: SelectionMachine::new(),
            metrics,
            camera,
            targets: Vec::new(),
            renderer,
            tweener,
            observer,
            subscriptions: Vec::new(),
            destroyed: false,
        };
        stage.recompute_targets();
        for (panel, target) in stage.panels.iter_mut().zip(&stage.targets) {
            panel.transform = *target;
        }
        stage.push_transforms();
        log::info!(
            "[stage] created: panels={} viewport={}x{} mode={}",
            stage.panels.len(),
            viewport.width,
            viewport.height,
            stage.config.mode.name()
        );
        Ok(stage)
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn panels(&self) -> &PanelRegistry {
        &self.panels
    }

    pub fn metrics(&self) -> &StageMetrics {
        &self.metrics
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Latest layout targets, indexed by panel.
    pub fn targets(&self) -> &[Transform] {
        &self.targets
    }

    pub fn tweener(&self) -> &T {
        &self.tweener
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn selection(&self) -> Selection {
        self.selection.current()
    }

    /// Selected panel index, `-1` when none.
    pub fn selected_index(&self) -> i32 {
        self.selection.current().as_js_index()
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.config.mode
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Panel under a client-space pointer inside `canvas_rect`.
    pub fn pick(&self, pointer: Vec2, canvas_rect: &Viewport) -> Option<usize> {
        resolve_hit(pointer, canvas_rect, &self.camera, &self.panels)
    }

    /// Pointer click at `pointer` on a canvas currently occupying
    /// `canvas_rect`. Returns the transition it caused, if any.
    pub fn click(&mut self, pointer: Vec2, canvas_rect: Viewport) -> Option<SelectionChange> {
        if self.destroyed {
            return None;
        }
        self.sync_viewport(canvas_rect);
        let hit = self.pick(pointer, &canvas_rect);
        let change = self.selection.on_hit(hit)?;
        self.apply_change(change);
        Some(change)
    }

    /// Programmatic selection without toggle semantics. Out-of-range
    /// indices are ignored.
    pub fn select(&mut self, index: Option<usize>) -> Option<SelectionChange> {
        if self.destroyed {
            return None;
        }
        if let Some(i) = index {
            if i >= self.panels.len() {
                log::warn!("[select] index {} out of range ({} panels)", i, self.panels.len());
                return None;
            }
        }
        let change = self.selection.set(Selection::from_index(index))?;
        self.apply_change(change);
        Some(change)
    }

    fn apply_change(&mut self, change: SelectionChange) {
        log::info!(
            "[select] {} -> {}",
            change.previous.as_js_index(),
            change.current.as_js_index()
        );
        self.recompute_targets();
        self.driver.drive(&self.panels, &self.targets, &mut self.tweener);
        let bounds = change
            .newly_selected()
            .and_then(|i| self.target_screen_bounds(i));
        (self.observer)(change.current.index(), bounds);
    }

    /// Tracks the canvas rectangle: a new size re-lays out, a moved origin
    /// only shifts screen projection.
    pub fn sync_viewport(&mut self, canvas_rect: Viewport) {
        if !canvas_rect.is_valid() {
            return;
        }
        if canvas_rect.same_size(&self.metrics.viewport) {
            self.metrics.viewport = canvas_rect;
        } else {
            self.resize(canvas_rect);
        }
    }

    /// Re-derives every viewport-dependent constant and moves panels to
    /// their new targets. Independent of any animation in flight.
    pub fn resize(&mut self, viewport: Viewport) {
        if self.destroyed {
            return;
        }
        let metrics = match StageMetrics::derive(viewport, &self.config) {
            Ok(m) => m,
            Err(e) => {
                log::warn!("[resize] ignored: {}", e);
                return;
            }
        };
        self.metrics = metrics;
        self.camera.set_aspect(metrics.aspect);
        self.renderer.resize(&viewport);
        self.recompute_targets();
        match self.config.resize {
            ResizeBehavior::Snap => {
                self.driver.snap(&mut self.panels, &self.targets, &mut self.tweener);
            }
            ResizeBehavior::Tween { duration_sec } => {
                let timing = TransitionTiming::uniform(duration_sec, self.config.timing.ease);
                self.driver
                    .drive_with(&self.panels, &self.targets, &mut self.tweener, timing);
            }
        }
        log::debug!("[resize] {}x{}", viewport.width, viewport.height);
    }

    /// Switches between sidebar and ring, animating every resting panel.
    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        if self.destroyed || mode == self.config.mode {
            return;
        }
        self.config.mode = mode;
        self.recompute_targets();
        self.driver.drive(&self.panels, &self.targets, &mut self.tweener);
        log::info!("[stage] layout mode -> {}", mode.name());
    }

    /// Per-frame step: advance tweens, hand live transforms to the renderer
    /// and present.
    pub fn tick(&mut self, dt_sec: f32) {
        if self.destroyed {
            return;
        }
        let panels = &mut self.panels;
        self.tweener
            .advance(dt_sec, &mut |key, value| apply_channel(panels, key, value));
        self.push_transforms();
        self.renderer.render(&self.camera);
    }

    /// Screen rectangle of the active panel as currently drawn. `None` when
    /// nothing is selected; a zero rectangle when the projection degenerates.
    pub fn active_panel_screen_bounds(&self) -> Option<ScreenRect> {
        let index = self.selection.current().index()?;
        let panel = self.panels.get(index)?;
        Some(self.project_bounds(index, &panel.transform))
    }

    /// Screen rectangle the active panel is heading to.
    pub fn active_panel_target_bounds(&self) -> Option<ScreenRect> {
        let index = self.selection.current().index()?;
        self.target_screen_bounds(index)
    }

    fn target_screen_bounds(&self, index: usize) -> Option<ScreenRect> {
        let target = self.targets.get(index)?;
        Some(self.project_bounds(index, target))
    }

    fn project_bounds(&self, index: usize, transform: &Transform) -> ScreenRect {
        let Some(panel) = self.panels.get(index) else {
            return ScreenRect::ZERO;
        };
        let view_proj = self.camera.view_projection();
        let mut points = Vec::with_capacity(4);
        for corner in panel.corners(transform) {
            match project_world_to_screen(corner, view_proj, &self.metrics.viewport) {
                Some(p) => points.push(p),
                None => return ScreenRect::ZERO,
            }
        }
        ScreenRect::from_points(points)
    }

    /// Swaps one panel's content. Transform and layout role are untouched;
    /// out-of-range indices and unloadable sources are a no-op. Returns
    /// whether the content was replaced.
    pub fn replace_panel_content(
        &mut self,
        index: usize,
        source: &str,
        images: &mut dyn ImageSource,
    ) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(object) = self.panels.get(index).map(|p| p.object) else {
            log::warn!(
                "[content] replace ignored: index {} out of range ({} panels)",
                index,
                self.panels.len()
            );
            return false;
        };
        let handle = match images.load(source) {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("[content] panel {} keeps its content: {}", index, e);
                return false;
            }
        };
        if let Some(Some(old)) = self.panels.set_content(index, source.to_string(), Some(handle)) {
            images.release(old);
        }
        self.renderer.set_content(object, Some(handle));
        true
    }

    /// Hands a host registration to the stage; `destroy` cancels it.
    pub fn attach(&mut self, subscription: Box<dyn Subscription>) {
        if self.destroyed {
            let mut subscription = subscription;
            subscription.cancel();
            return;
        }
        self.subscriptions.push(subscription);
    }

    /// Releases listeners, animations and renderer resources. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        for mut sub in self.subscriptions.drain(..) {
            sub.cancel();
        }
        self.tweener.clear();
        self.selection.reset();
        self.renderer.release();
        log::info!("[stage] destroyed");
    }

    fn recompute_targets(&mut self) {
        let depths = LayoutDepths {
            resting_z: self.config.camera.resting_z,
            active_z: self.config.camera.active_z,
        };
        self.targets = compute_target_transforms(
            &self.panels,
            self.selection.current(),
            &self.metrics,
            self.config.mode,
            &self.config.layout,
            depths,
        );
    }

    fn push_transforms(&mut self) {
        for panel in self.panels.iter() {
            self.renderer.set_transform(panel.object, &panel.transform);
        }
    }
}

impl<R: Renderer, T: Tweener> Drop for Stage<R, T> {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn load_content(
    images: &mut dyn ImageSource,
    index: usize,
    source: &str,
) -> Option<ContentHandle> {
    match images.load(source) {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("[content] panel {} shows placeholder: {}", index, e);
            None
        }
    }
}
