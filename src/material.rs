use glam::Vec3;

/// Phong reflectance in panel units (0..=255 per channel).
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDescriptor {
    pub ka: Vec3,
    pub kd: Vec3,
    pub ks: Vec3,
    pub shininess: f32,
}

impl MaterialDescriptor {
    pub fn new(ka: Vec3, kd: Vec3, ks: Vec3, shininess: f32) -> Self {
        Self { ka, kd, ks, shininess }
    }

    /// Tinted ambient with a white diffuse/specular response.
    pub fn tinted(ka: Vec3, shininess: f32) -> Self {
        Self::new(ka, Vec3::splat(255.0), Vec3::splat(255.0), shininess)
    }
}

/// One material per drawable surface of the fixed scene.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialSet {
    pub ground: MaterialDescriptor,
    pub cube: MaterialDescriptor,
    pub cylinder: MaterialDescriptor,
    pub torus: MaterialDescriptor,
    pub bunny: MaterialDescriptor,
}

impl Default for MaterialSet {
    fn default() -> Self {
        let dirt = Vec3::new(112.0, 82.0, 44.0);
        Self {
            ground: MaterialDescriptor::new(dirt, dirt, dirt, 4.0),
            cube: MaterialDescriptor::tinted(Vec3::new(189.0, 40.0, 40.0), 8.0),
            cylinder: MaterialDescriptor::tinted(Vec3::new(45.0, 189.0, 40.0), 16.0),
            torus: MaterialDescriptor::tinted(Vec3::new(47.0, 40.0, 189.0), 32.0),
            bunny: MaterialDescriptor::tinted(Vec3::new(173.0, 148.0, 21.0), 64.0),
        }
    }
}

impl MaterialSet {
    pub const NAMES: [&'static str; 5] = ["ground", "cube", "cylinder", "torus", "bunny"];

    pub fn get(&self, name: &str) -> Option<&MaterialDescriptor> {
        match name {
            "ground" => Some(&self.ground),
            "cube" => Some(&self.cube),
            "cylinder" => Some(&self.cylinder),
            "torus" => Some(&self.torus),
            "bunny" => Some(&self.bunny),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut MaterialDescriptor> {
        match name {
            "ground" => Some(&mut self.ground),
            "cube" => Some(&mut self.cube),
            "cylinder" => Some(&mut self.cylinder),
            "torus" => Some(&mut self.torus),
            "bunny" => Some(&mut self.bunny),
            _ => None,
        }
    }
}
