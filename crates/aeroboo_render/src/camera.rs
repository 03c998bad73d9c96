use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Fixed screen-space camera: one world unit per logical pixel, origin at the
/// top-left corner, y pointing down. The surface may be larger on HiDPI
/// displays; the projection stretches the logical viewport over it.
pub struct ScreenCamera {
    pub viewport: (f32, f32),
}

impl ScreenCamera {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        Mat4::orthographic_rh(0.0, self.viewport.0, self.viewport.1, 0.0, -1.0, 1.0)
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn project(camera: &ScreenCamera, x: f32, y: f32) -> (f32, f32) {
        let clip = camera.view_proj() * Vec4::new(x, y, 0.0, 1.0);
        (clip.x / clip.w, clip.y / clip.w)
    }

    #[test]
    fn top_left_maps_to_clip_top_left() {
        let camera = ScreenCamera::new(800.0, 600.0);
        let (x, y) = project(&camera, 0.0, 0.0);
        assert!((x + 1.0).abs() < 1e-5);
        assert!((y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn bottom_right_maps_to_clip_bottom_right() {
        let camera = ScreenCamera::new(800.0, 600.0);
        let (x, y) = project(&camera, 800.0, 600.0);
        assert!((x - 1.0).abs() < 1e-5);
        assert!((y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn center_maps_to_origin() {
        let camera = ScreenCamera::new(800.0, 600.0);
        let (x, y) = project(&camera, 400.0, 300.0);
        assert!(x.abs() < 1e-5);
        assert!(y.abs() < 1e-5);
    }
}
