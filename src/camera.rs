use nalgebra as na;

/// Perspective camera looking from `eye` at `target`, Y up.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: na::Point3<f32>,
    pub target: na::Point3<f32>,
    pub up: na::Vector3<f32>,

    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,

    aspect: f32,
}

impl Camera {
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            eye: na::Point3::new(0.0, 0.0, 1.0),
            target: na::Point3::origin(),
            up: na::Vector3::y(),
            fov_y_degrees,
            near,
            far,
            aspect,
        }
    }

    pub fn looking_at(mut self, eye: na::Point3<f32>, target: na::Point3<f32>) -> Self {
        self.eye = eye;
        self.target = target;
        self
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Sets the aspect ratio from a viewport size. Both dimensions must be
    /// positive.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        assert!(width > 0 && height > 0, "degenerate viewport {}x{}", width, height);

        self.aspect = width as f32 / height as f32;
    }

    pub fn view(&self) -> na::Matrix4<f32> {
        na::Matrix4::look_at_rh(&self.eye, &self.target, &self.up)
    }

    pub fn projection(&self) -> na::Matrix4<f32> {
        na::Perspective3::new(
            self.aspect,
            self.fov_y_degrees.to_radians(),
            self.near,
            self.far,
        )
        .to_homogeneous()
    }

    pub fn view_projection(&self) -> na::Matrix4<f32> {
        self.projection() * self.view()
    }

    pub fn distance(&self) -> f32 {
        (self.eye - self.target).norm()
    }
}
