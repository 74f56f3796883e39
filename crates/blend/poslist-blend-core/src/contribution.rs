use poslist_api_core::Vec3;

/// One named, weighted position in a blend list.
///
/// `position` is in the engine's internal unit (centimeters). `name` is for display only and
/// never influences the blend.
#[derive(Clone, Debug, PartialEq)]
pub struct Contribution {
    pub name: String,
    pub weight: f32,
    pub absolute: bool,
    pub position: Vec3,
}

impl Default for Contribution {
    fn default() -> Self {
        Self {
            name: String::new(),
            weight: 1.0,
            absolute: false,
            position: Vec3::ZERO,
        }
    }
}

impl Contribution {
    /// Additive entry: contributes `position * weight`.
    pub fn relative(weight: f32, position: Vec3) -> Self {
        Self {
            weight,
            position,
            ..Default::default()
        }
    }

    /// Override entry: pulls the running blend towards `position` by `weight`.
    pub fn absolute(weight: f32, position: Vec3) -> Self {
        Self {
            weight,
            absolute: true,
            position,
            ..Default::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
