use std::fs;
use std::path::Path;

use phong_viewer::uniforms::blocks::MAX_LIGHTS;

const SHADER_PATH: &str = "src/shaders/phong.wgsl";

fn shader_source() -> String {
    fs::read_to_string(Path::new(SHADER_PATH)).expect("Failed to read shader file")
}

#[test]
fn test_shader_file_exists() {
    let shader_path = Path::new(SHADER_PATH);
    assert!(shader_path.exists(), "Shader file should exist at {:?}", shader_path);
}

#[test]
fn test_shader_entry_points() {
    let shader_content = shader_source();

    assert!(shader_content.contains("@vertex"), "Shader should contain vertex entry point");
    assert!(shader_content.contains("@fragment"), "Shader should contain fragment entry point");
    assert!(shader_content.contains("fn vs_main"), "Shader should have vs_main function");
    assert!(shader_content.contains("fn fs_main"), "Shader should have fs_main function");
}

#[test]
fn test_shader_bindings() {
    let shader_content = shader_source();

    assert!(
        shader_content.contains("@group(0) @binding(0) var<uniform> frame: Frame"),
        "Frame block should be binding 0"
    );
    assert!(
        shader_content.contains("@group(0) @binding(1) var<uniform> node: Node"),
        "Node block should be binding 1"
    );
    assert!(shader_content.contains("@location(0) position"), "Shader should have position attribute");
    assert!(shader_content.contains("@location(1) normal"), "Shader should have normal attribute");
}

#[test]
fn test_shader_light_capacity_matches_blocks() {
    let shader_content = shader_source();

    assert!(
        shader_content.contains(&format!("array<Light, {MAX_LIGHTS}>")),
        "Light array should hold {MAX_LIGHTS} lights"
    );
    assert!(
        shader_content.contains(&format!("const MAX_LIGHTS: i32 = {MAX_LIGHTS};")),
        "Loop bound should match the light array"
    );
}

#[test]
fn test_shader_light_fields_follow_block_order() {
    let shader_content = shader_source();
    let fields = ["ambient", "aperture", "diffuse", "cutoff", "specular", "position", "axis"];

    let light_struct = shader_content
        .split("struct Light {")
        .nth(1)
        .and_then(|rest| rest.split('}').next())
        .expect("Shader should define the Light struct");

    let offsets: Vec<_> = fields
        .iter()
        .map(|field| {
            light_struct
                .find(&format!("{field}:"))
                .unwrap_or_else(|| panic!("Light struct is missing {field}"))
        })
        .collect();
    assert!(offsets.windows(2).all(|w| w[0] < w[1]), "Light fields out of order");
}

#[test]
fn test_shader_view_space_lighting() {
    let shader_content = shader_source();

    assert!(shader_content.contains("node.model_view * vec4<f32>(input.position, 1.0)"));
    assert!(shader_content.contains("node.normals * vec4<f32>(input.normal, 0.0)"));
    assert!(shader_content.contains("frame.projection * view_position"));
    assert!(
        shader_content.contains("light.position.w == 0.0"),
        "Shader should branch on directional lights"
    );
}
