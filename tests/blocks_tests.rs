use std::mem::size_of;

use approx::assert_relative_eq;
use glam::{Mat3, Mat4, Vec3};
use phong_viewer::light::LightDescriptor;
use phong_viewer::matrix_stack::MatrixStack;
use phong_viewer::scene::{render_frame, MeshDraw, MeshKind, Primitive, SceneState};
use phong_viewer::uniforms::{upload_model_view, UniformName, UniformSink};
use phong_viewer::uniforms::blocks::{
    FrameRecorder, FrameUniform, LightUniform, NodeUniform, MAX_LIGHTS, NODE_UNIFORM_STRIDE,
};

fn record(state: &SceneState) -> FrameRecorder {
    let mut recorder = FrameRecorder::new();
    let mut stack = MatrixStack::new();
    recorder.begin_frame();
    render_frame(state, &mut stack, &mut recorder);
    recorder
}

#[test]
fn test_block_sizes_match_shader_layout() {
    assert_eq!(size_of::<LightUniform>(), 80);
    assert_eq!(size_of::<FrameUniform>(), 64 + 16 + 80 * MAX_LIGHTS);
    assert_eq!(size_of::<NodeUniform>(), 176);
    assert!(size_of::<NodeUniform>() as u64 <= NODE_UNIFORM_STRIDE);
    assert_eq!(size_of::<FrameUniform>() % 16, 0);
}

#[test]
fn test_recorder_captures_default_scene() {
    let state = SceneState::with_defaults();
    let recorder = record(&state);

    assert_eq!(recorder.frame().light_count, 3);
    assert_eq!(recorder.requested_lights(), 3);
    assert_eq!(
        recorder.frame().projection,
        state.camera.projection_matrix().to_cols_array_2d()
    );

    let meshes: Vec<_> = recorder.draws().iter().map(|draw| draw.mesh).collect();
    assert_eq!(
        meshes,
        vec![
            MeshKind::Cube,
            MeshKind::Cube,
            MeshKind::Cylinder,
            MeshKind::Torus,
            MeshKind::Bunny
        ]
    );
}

#[test]
fn test_recorder_node_blocks_carry_materials() {
    let state = SceneState::with_defaults();
    let recorder = record(&state);
    let draws = recorder.draws();

    let ground = &draws[0].node;
    assert_relative_eq!(ground.ka[0], 112.0 / 255.0, epsilon = 1e-6);
    assert_relative_eq!(ground.ka[1], 82.0 / 255.0, epsilon = 1e-6);
    assert_eq!(ground.shininess, 4.0);

    let bunny = &draws[4].node;
    assert_eq!(bunny.shininess, 64.0);
    assert_relative_eq!(bunny.kd[0], 1.0, epsilon = 1e-6);
    assert_ne!(ground.model_view, bunny.model_view);
}

#[test]
fn test_recorder_light_slots() {
    let mut state = SceneState::with_defaults();
    state.lights.get_mut("global").unwrap().active = false;
    let recorder = record(&state);
    let lights = &recorder.frame().lights;

    assert_eq!(lights[0].ambient, [0.0; 3], "Inactive light carries no energy");
    assert_eq!(lights[0].position[3], 0.0);
    assert_relative_eq!(lights[2].aperture, 20.0_f32.to_radians(), epsilon = 1e-6);
    assert_eq!(lights[2].cutoff, 4.0);
    assert_eq!(lights[3], LightUniform::default(), "Unused slots stay zeroed");
}

#[test]
fn test_recorder_clamps_light_count() {
    let mut state = SceneState::with_defaults();
    for i in 0..7 {
        state.lights.insert(
            format!("extra{i}"),
            LightDescriptor::positional(Vec3::new(i as f32, 1.0, 0.0), Vec3::splat(10.0)),
        );
    }
    let recorder = record(&state);

    assert_eq!(recorder.requested_lights(), 10);
    assert_eq!(recorder.frame().light_count, MAX_LIGHTS as i32);
    assert_eq!(recorder.draws().len(), 5);
}

#[test]
fn test_begin_frame_resets_recording() {
    let state = SceneState::with_defaults();
    let mut recorder = record(&state);

    recorder.begin_frame();

    assert!(recorder.draws().is_empty());
    assert_eq!(recorder.requested_lights(), 0);
    assert_eq!(*recorder.frame(), FrameUniform::default());
}

#[test]
fn test_recorder_takes_normals_as_mat4_only() {
    let mut recorder = FrameRecorder::new();
    recorder.set_mat3(UniformName::Normals, Mat3::from_diagonal(Vec3::splat(2.0)));
    recorder.set_mat3(UniformName::ModelView, Mat3::from_diagonal(Vec3::splat(2.0)));
    assert_eq!(
        *recorder.frame(),
        FrameUniform::default(),
        "Mat3 writes should not touch the frame block"
    );

    let model_view = Mat4::from_scale(Vec3::new(2.0, 1.0, 4.0));
    upload_model_view(&mut recorder, model_view);
    recorder.set_mat3(UniformName::Normals, Mat3::IDENTITY);
    recorder.draw(MeshKind::Cube, Primitive::Triangles);

    let node = &recorder.draws()[0].node;
    assert_eq!(node.model_view, model_view.to_cols_array_2d());
    assert_eq!(
        node.normals,
        model_view.transpose().inverse().to_cols_array_2d(),
        "Normals block should keep the mat4 upload"
    );
}
