use crate::constants::TRANSFORM_EPSILON;
use crate::host::{ContentHandle, ObjectId};
use fnv::FnvHashMap;
use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

/// Translation, Euler XYZ rotation (radians) and scale of a panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn new(translation: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.translation)
    }

    pub fn approx_eq(&self, other: &Transform) -> bool {
        self.translation.abs_diff_eq(other.translation, TRANSFORM_EPSILON)
            && self.rotation.abs_diff_eq(other.rotation, TRANSFORM_EPSILON)
            && self.scale.abs_diff_eq(other.scale, TRANSFORM_EPSILON)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Ordered content descriptor a stage is built from.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelContent {
    pub source: String,
    /// Native world size; the layout default applies when absent.
    pub native_size: Option<Vec2>,
}

impl PanelContent {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            native_size: None,
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.native_size = Some(Vec2::new(width, height));
        self
    }
}

#[derive(Clone, Debug)]
pub struct Panel {
    pub index: usize,
    pub object: ObjectId,
    pub source: String,
    pub content: Option<ContentHandle>,
    pub native_size: Vec2,
    /// Live transform, written by the transition path every frame.
    pub transform: Transform,
}

impl Panel {
    pub fn aspect(&self) -> f32 {
        self.native_size.x / self.native_size.y
    }

    pub fn is_placeholder(&self) -> bool {
        self.content.is_none()
    }

    /// Quad corners in world space under `transform`.
    pub fn corners(&self, transform: &Transform) -> [Vec3; 4] {
        let m = transform.matrix();
        let h = self.native_size * 0.5;
        [
            Vec2::new(-h.x, -h.y),
            Vec2::new(h.x, -h.y),
            Vec2::new(h.x, h.y),
            Vec2::new(-h.x, h.y),
        ]
        .map(|c| m.transform_point3(c.extend(0.0)))
    }
}

/// Owns the panels in index order plus the object-to-index side table.
#[derive(Debug, Default)]
pub struct PanelRegistry {
    panels: Vec<Panel>,
    by_object: FnvHashMap<ObjectId, usize>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a panel; its index is its position in the registry.
    pub fn push(
        &mut self,
        object: ObjectId,
        source: String,
        content: Option<ContentHandle>,
        native_size: Vec2,
        transform: Transform,
    ) -> usize {
        let index = self.panels.len();
        self.by_object.insert(object, index);
        self.panels.push(Panel {
            index,
            object,
            source,
            content,
            native_size,
            transform,
        });
        index
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Panel> {
        self.panels.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Panel> {
        self.panels.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Panel> {
        self.panels.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Panel> {
        self.panels.iter_mut()
    }

    /// Panel index behind a renderer object.
    pub fn index_of_object(&self, object: ObjectId) -> Option<usize> {
        self.by_object.get(&object).copied()
    }

    /// Swaps content, returning the previous handle. Out-of-range indices
    /// leave the registry untouched.
    pub fn set_content(
        &mut self,
        index: usize,
        source: String,
        content: Option<ContentHandle>,
    ) -> Option<Option<ContentHandle>> {
        let panel = self.panels.get_mut(index)?;
        panel.source = source;
        Some(std::mem::replace(&mut panel.content, content))
    }
}
