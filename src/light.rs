use glam::{Vec3, Vec4};

/// A light as edited on the panel. Colors are in panel units, 0..=255 per channel.
#[derive(Clone, Debug, PartialEq)]
pub struct LightDescriptor {
    pub active: bool,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    /// World-space position; `w = 0` is a directional light, `w = 1` a positional one.
    pub position: Vec4,
    /// Spotlight cone axis, world space.
    pub axis: Vec3,
    /// Cone half-angle in degrees.
    pub aperture: f32,
    /// Falloff exponent towards the cone edge.
    pub cutoff: f32,
}

impl LightDescriptor {
    pub fn directional(direction: Vec3, color: Vec3) -> Self {
        Self::omni(direction.extend(0.0), color)
    }

    pub fn positional(position: Vec3, color: Vec3) -> Self {
        Self::omni(position.extend(1.0), color)
    }

    pub fn spot(position: Vec3, color: Vec3, axis: Vec3, aperture: f32, cutoff: f32) -> Self {
        Self {
            axis,
            aperture,
            cutoff,
            ..Self::omni(position.extend(1.0), color)
        }
    }

    fn omni(position: Vec4, color: Vec3) -> Self {
        Self {
            active: true,
            ambient: color,
            diffuse: color,
            specular: color,
            position,
            axis: Vec3::NEG_Y,
            aperture: 180.0,
            cutoff: 0.0,
        }
    }

    pub fn is_directional(&self) -> bool {
        self.position.w == 0.0
    }
}

/// Ordered name → light mapping. Position in the set is the shader array index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightSet {
    entries: Vec<(String, LightDescriptor)>,
}

impl LightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three-light rig the viewer starts with.
    pub fn default_rig() -> Self {
        let mut lights = Self::new();
        lights.insert(
            "global",
            LightDescriptor {
                axis: Vec3::NEG_Y,
                ..LightDescriptor::directional(Vec3::new(-5.0, 5.0, -5.0), Vec3::splat(100.0))
            },
        );
        lights.insert(
            "local",
            LightDescriptor {
                axis: Vec3::new(0.0, -5.0, 0.0),
                ..LightDescriptor::positional(Vec3::new(5.0, 6.0, 0.0), Vec3::new(50.0, 50.0, 100.0))
            },
        );
        lights.insert(
            "spotlight",
            LightDescriptor::spot(
                Vec3::new(0.0, 6.0, 5.0),
                Vec3::new(100.0, 100.0, 25.0),
                Vec3::new(0.0, -1.0, -0.5),
                20.0,
                4.0,
            ),
        );
        lights
    }

    /// Inserts a light at the end, or replaces an existing one in place.
    /// Returns the light's index.
    pub fn insert(&mut self, name: impl Into<String>, light: LightDescriptor) -> usize {
        let name = name.into();
        if let Some(index) = self.index_of(&name) {
            self.entries[index].1 = light;
            return index;
        }
        self.entries.push((name, light));
        self.entries.len() - 1
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&LightDescriptor> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, l)| l)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut LightDescriptor> {
        self.entries.iter_mut().find(|(n, _)| n == name).map(|(_, l)| l)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LightDescriptor)> {
        self.entries.iter().map(|(n, l)| (n.as_str(), l))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}
