use approx::assert_relative_eq;
use glam::{Mat4, Vec3, Vec4};
use phong_viewer::panel::{PanelError, ParamPanel, Refresh, SliderRange, VecProxy};
use phong_viewer::scene::SceneState;

fn setup() -> (SceneState, ParamPanel) {
    let state = SceneState::with_defaults();
    let panel = ParamPanel::for_scene(&state);
    (state, panel)
}

#[test]
fn test_panel_exposes_every_folder() {
    let (_, panel) = setup();
    let paths: Vec<_> = panel.paths().collect();

    for expected in [
        "Camera/eye/x",
        "Camera/at/z",
        "Camera/up/y",
        "Camera/fovy",
        "Camera/near",
        "Camera/far",
        "Lights/global/active",
        "Lights/local/diffuse/g",
        "Lights/spotlight/position/w",
        "Lights/spotlight/axis/z",
        "Lights/spotlight/aperture",
        "Lights/spotlight/cutoff",
        "Materials/ground/Ka/r",
        "Materials/bunny/Ks/b",
        "Materials/torus/shininess",
        "Render/backfaceCulling",
        "Render/depthTest",
    ] {
        assert!(paths.contains(&expected), "Missing panel path {expected}");
    }
}

#[test]
fn test_slider_ranges() {
    let (_, panel) = setup();

    let fovy = panel.scalar("Camera/fovy").unwrap();
    assert_eq!(fovy.range, SliderRange::Continuous { min: 20.0, max: 160.0 });
    assert_eq!(fovy.refresh, Refresh::Projection);

    let w = panel.scalar("Lights/local/position/w").unwrap();
    assert!(w.range.contains(0.0));
    assert!(w.range.contains(1.0));
    assert!(!w.range.contains(0.5));

    let color = panel.scalar("Materials/cube/Kd/g").unwrap();
    assert_eq!(color.range, SliderRange::Continuous { min: 0.0, max: 255.0 });
    assert_eq!(color.refresh, Refresh::None);

    assert_eq!(panel.scalar("Camera/eye/y").unwrap().refresh, Refresh::View);
}

#[test]
fn test_eye_edit_refreshes_view() {
    let (mut state, panel) = setup();
    let before = state.camera.view_matrix();

    panel.set(&mut state, "Camera/eye/x", 3.0).unwrap();

    assert_eq!(state.camera.eye, Vec3::new(3.0, 5.0, 10.0));
    assert_ne!(state.camera.view_matrix(), before);
    let expected = Mat4::look_at_rh(state.camera.eye, state.camera.at, state.camera.up);
    assert!(state.camera.view_matrix().abs_diff_eq(expected, 1e-6));
}

#[test]
fn test_lens_edit_refreshes_projection() {
    let (mut state, panel) = setup();
    state.camera.update_projection(2.0);

    panel.set(&mut state, "Camera/fovy", 90.0).unwrap();

    assert_eq!(state.camera.fovy, 90.0);
    assert_relative_eq!(state.camera.aspect_ratio(), 2.0);
    let expected = Mat4::perspective_rh(90.0_f32.to_radians(), 2.0, 0.1, 40.0);
    assert!(state.camera.projection_matrix().abs_diff_eq(expected, 1e-6));
}

#[test]
fn test_color_component_edit() {
    let (mut state, panel) = setup();

    panel.set(&mut state, "Lights/local/diffuse/b", 200.0).unwrap();
    panel.set(&mut state, "Materials/ground/Ks/r", 0.0).unwrap();

    assert_eq!(
        state.lights.get("local").unwrap().diffuse,
        Vec3::new(50.0, 50.0, 200.0)
    );
    assert_eq!(state.lights.get("local").unwrap().ambient.z, 100.0, "Other channels untouched");
    assert_eq!(state.materials.ground.ks, Vec3::new(0.0, 82.0, 44.0));
    assert_eq!(panel.get(&state, "Lights/local/diffuse/b"), Ok(200.0));
}

#[test]
fn test_position_w_switches_light_kind() {
    let (mut state, panel) = setup();

    panel.set(&mut state, "Lights/local/position/w", 0.0).unwrap();

    let local = state.lights.get("local").unwrap();
    assert_eq!(local.position, Vec4::new(5.0, 6.0, 0.0, 0.0));
    assert!(local.is_directional());
}

#[test]
fn test_out_of_range_value_is_stored() {
    let (mut state, panel) = setup();

    panel.set(&mut state, "Materials/cube/shininess", 500.0).unwrap();
    panel.set(&mut state, "Lights/global/ambient/r", -10.0).unwrap();

    assert_eq!(state.materials.cube.shininess, 500.0);
    assert_eq!(state.lights.get("global").unwrap().ambient.x, -10.0);
}

#[test]
fn test_unknown_path() {
    let (mut state, panel) = setup();

    assert_eq!(
        panel.set(&mut state, "Lights/moon/aperture", 10.0),
        Err(PanelError::UnknownField("Lights/moon/aperture".to_string()))
    );
    assert_eq!(
        panel.get(&state, "Camera/eye/w"),
        Err(PanelError::UnknownField("Camera/eye/w".to_string()))
    );
    assert!(panel.toggle(&mut state, "Camera/fovy").is_err(), "Scalars are not toggles");
}

#[test]
fn test_binding_detaches_when_light_disappears() {
    let (_, panel) = setup();
    let mut other = SceneState::default();

    assert_eq!(
        panel.get(&other, "Lights/global/cutoff"),
        Err(PanelError::Detached("Lights/global/cutoff".to_string()))
    );
    assert_eq!(
        panel.set_toggle(&mut other, "Lights/global/active", false),
        Err(PanelError::Detached("Lights/global/active".to_string()))
    );
}

#[test]
fn test_toggles() {
    let (mut state, panel) = setup();

    assert_eq!(panel.toggle(&mut state, "Render/backfaceCulling"), Ok(true));
    assert!(state.flags.backface_culling);
    assert_eq!(panel.toggle(&mut state, "Render/depthTest"), Ok(false));
    assert!(!state.flags.depth_test);

    assert_eq!(panel.toggle(&mut state, "Lights/spotlight/active"), Ok(false));
    assert!(!state.lights.get("spotlight").unwrap().active);
    assert_eq!(panel.get_toggle(&state, "Lights/spotlight/active"), Ok(false));
}

#[test]
fn test_vec_proxy_bounds() {
    let mut state = SceneState::with_defaults();
    let proxy = VecProxy::<Vec3>::new(|s| Some(&s.camera.at), |s| Some(&mut s.camera.at));

    assert_eq!(proxy.len(), 3);
    assert!(!proxy.is_empty());
    assert_eq!(proxy.get(&state, 3), None);
    assert!(!proxy.set(&mut state, 3, 1.0));

    assert!(proxy.set(&mut state, 1, 2.5));
    assert_eq!(proxy.get(&state, 1), Some(2.5));
    assert_eq!(state.camera.at, Vec3::new(0.0, 2.5, 0.0));
}

#[test]
fn test_vec_proxy_reports_missing_target() {
    let mut state = SceneState::default();
    let proxy = VecProxy::<Vec4>::new(
        |s| s.lights.get("global").map(|l| &l.position),
        |s| s.lights.get_mut("global").map(|l| &mut l.position),
    );

    assert_eq!(proxy.len(), 4);
    assert_eq!(proxy.get(&state, 0), None);
    assert!(!proxy.set(&mut state, 0, 1.0));
}
