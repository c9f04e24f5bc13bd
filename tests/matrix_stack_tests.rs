use glam::{Mat4, Vec3, Vec4};
use phong_viewer::matrix_stack::MatrixStack;

#[test]
fn test_new_stack_is_identity() {
    let stack = MatrixStack::new();
    assert_eq!(stack.depth(), 1);
    assert_eq!(stack.current(), Mat4::IDENTITY);
}

#[test]
fn test_push_pop_restores_matrix() {
    let mut stack = MatrixStack::new();
    let view = Mat4::look_at_rh(Vec3::new(0.0, 5.0, 10.0), Vec3::ZERO, Vec3::Y);
    stack.load(view);

    stack.push();
    stack.translate(Vec3::new(1.0, 2.0, 3.0));
    stack.scale(Vec3::splat(4.0));
    assert_eq!(stack.depth(), 2);
    assert_ne!(stack.current(), view);

    assert!(stack.pop());
    assert_eq!(stack.depth(), 1);
    assert_eq!(stack.current(), view);
}

#[test]
fn test_pop_underflow_keeps_base() {
    let mut stack = MatrixStack::new();
    stack.load(Mat4::from_translation(Vec3::X));

    assert!(!stack.pop(), "Popping the base entry should be refused");
    assert_eq!(stack.depth(), 1);
    assert_eq!(stack.current(), Mat4::from_translation(Vec3::X));
}

#[test]
fn test_transforms_post_multiply() {
    let mut stack = MatrixStack::new();
    stack.translate(Vec3::new(1.0, 0.0, 0.0));
    stack.scale(Vec3::splat(2.0));

    // Scale applies to the vertex first, then the translation.
    let point = stack.current() * Vec4::new(1.0, 0.0, 0.0, 1.0);
    assert_eq!(point, Vec4::new(3.0, 0.0, 0.0, 1.0));
}

#[test]
fn test_nested_pushes() {
    let mut stack = MatrixStack::new();
    stack.push();
    stack.translate(Vec3::Y);
    stack.push();
    stack.translate(Vec3::Y);

    assert_eq!(stack.depth(), 3);
    assert_eq!(stack.current(), Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)));

    stack.pop();
    assert_eq!(stack.current(), Mat4::from_translation(Vec3::Y));
    stack.pop();
    assert_eq!(stack.current(), Mat4::IDENTITY);
}
