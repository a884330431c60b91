use glam::{Mat4, Vec3};

const DEFAULT_YAW: f32 = -90.0;
const DEFAULT_SPEED: f32 = 2.5;
const DEFAULT_SENSITIVITY: f32 = 0.1;
const DEFAULT_FOV: f32 = 45.0;

/// Movement directions for keyboard-driven camera motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

/// Free-look fly camera driven by keyboard and mouse input.
///
/// Orientation is stored as Euler yaw/pitch in degrees; the derived
/// front/right/up vectors are recomputed whenever the angles change.
#[derive(Debug, Clone, Copy)]
pub struct FlyCamera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub world_up: Vec3,
    /// Yaw in degrees (-90 looks down -Z)
    pub yaw: f32,
    /// Pitch in degrees, clamped to (-89, 89)
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
    /// Vertical field of view in degrees, adjusted by scroll zoom
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl FlyCamera {
    /// Create a camera at the given position looking down -Z
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: DEFAULT_YAW,
            pitch: 0.0,
            speed: DEFAULT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
            fov_y: DEFAULT_FOV,
            near: 0.1,
            far: 100.0,
        };
        camera.update_vectors();
        camera
    }

    /// Get the view matrix (world → camera space)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Get the projection matrix for the given aspect ratio
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), aspect, self.near, self.far)
    }

    /// Move the camera along its local axes
    pub fn process_keyboard(&mut self, direction: MoveDirection, delta_time: f32) {
        let velocity = self.speed * delta_time;
        match direction {
            MoveDirection::Forward => self.position += self.front * velocity,
            MoveDirection::Backward => self.position -= self.front * velocity,
            MoveDirection::Left => self.position -= self.right * velocity,
            MoveDirection::Right => self.position += self.right * velocity,
        }
    }

    /// Rotate the camera from a mouse delta (pixels)
    pub fn process_mouse(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw += delta_x * self.sensitivity;
        self.pitch += delta_y * self.sensitivity;

        // Keep pitch away from the poles so the view doesn't flip
        self.pitch = self.pitch.clamp(-89.0, 89.0);

        self.update_vectors();
    }

    /// Zoom by adjusting the field of view from a scroll delta
    pub fn process_scroll(&mut self, delta_y: f32) {
        self.fov_y = (self.fov_y - delta_y).clamp(1.0, 45.0);
    }

    /// Recompute front/right/up from yaw and pitch
    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = FlyCamera::new(Vec3::new(0.0, 0.0, 3.0));

        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 3.0));
        // Default yaw of -90 degrees looks down -Z
        assert!((camera.front - Vec3::NEG_Z).length() < 1e-6);
        assert_eq!(camera.fov_y, 45.0);
    }

    #[test]
    fn test_view_matrix() {
        let camera = FlyCamera::new(Vec3::new(0.0, 0.0, 5.0));

        let view = camera.view_matrix();
        // View matrix should translate camera to origin
        assert!(view.w_axis.z < 0.0);
    }

    #[test]
    fn test_keyboard_movement() {
        let mut camera = FlyCamera::new(Vec3::ZERO);

        camera.process_keyboard(MoveDirection::Forward, 1.0);
        // Moved along -Z at default speed
        assert!((camera.position.z + 2.5).abs() < 1e-5);
        assert!(camera.position.x.abs() < 1e-5);

        camera.process_keyboard(MoveDirection::Right, 1.0);
        assert!((camera.position.x - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut camera = FlyCamera::new(Vec3::ZERO);

        // A huge upward mouse move must not flip the camera
        camera.process_mouse(0.0, 10_000.0);
        assert_eq!(camera.pitch, 89.0);

        camera.process_mouse(0.0, -100_000.0);
        assert_eq!(camera.pitch, -89.0);
    }

    #[test]
    fn test_scroll_zoom_clamped() {
        let mut camera = FlyCamera::new(Vec3::ZERO);

        camera.process_scroll(10.0);
        assert_eq!(camera.fov_y, 35.0);

        camera.process_scroll(-100.0);
        assert_eq!(camera.fov_y, 45.0);

        camera.process_scroll(1000.0);
        assert_eq!(camera.fov_y, 1.0);
    }
}
