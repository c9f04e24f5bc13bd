use glam::{Mat4, Vec3};

/// Model-view matrix stack. The bottom entry is never popped.
#[derive(Clone, Debug)]
pub struct MatrixStack {
    stack: Vec<Mat4>,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixStack {
    pub fn new() -> Self {
        Self {
            stack: vec![Mat4::IDENTITY],
        }
    }

    /// Replaces the top of the stack.
    pub fn load(&mut self, matrix: Mat4) {
        *self.top_mut() = matrix;
    }

    pub fn push(&mut self) {
        let top = self.current();
        self.stack.push(top);
    }

    /// Returns false (and leaves the base entry in place) on underflow.
    pub fn pop(&mut self) -> bool {
        if self.stack.len() == 1 {
            log::warn!("Matrix stack underflow, pop ignored");
            return false;
        }
        self.stack.pop();
        true
    }

    pub fn translate(&mut self, offset: Vec3) {
        let top = self.top_mut();
        *top *= Mat4::from_translation(offset);
    }

    pub fn scale(&mut self, factors: Vec3) {
        let top = self.top_mut();
        *top *= Mat4::from_scale(factors);
    }

    pub fn current(&self) -> Mat4 {
        self.stack.last().copied().unwrap_or(Mat4::IDENTITY)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn top_mut(&mut self) -> &mut Mat4 {
        if self.stack.is_empty() {
            self.stack.push(Mat4::IDENTITY);
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }
}
