//! Camera model, pose and image passed explicitly to terrain colouring.

/// Pinhole intrinsics of a rectified camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinholeCamera {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl PinholeCamera {
    /// Project a point in the optical frame (z forward) to pixel coordinates.
    ///
    /// Returns `None` for points behind the camera or outside the image.
    pub fn project(&self, point: [f32; 3]) -> Option<(u32, u32)> {
        let [x, y, z] = point;
        if z <= 0.0 {
            return None;
        }
        let u = self.fx * x / z + self.cx;
        let v = self.fy * y / z + self.cy;
        let inside = u >= 0.0 && v >= 0.0 && u < self.width as f32 && v < self.height as f32;
        inside.then_some((u as u32, v as u32))
    }
}

/// Rigid transform `p' = R p + t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidTransform {
    /// Row-major rotation matrix
    pub rotation: [[f32; 3]; 3],
    pub translation: [f32; 3],
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    pub fn new(rotation: [[f32; 3]; 3], translation: [f32; 3]) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]], [0.0; 3])
    }

    /// World to optical frame of a camera at `position` looking straight down,
    /// image x along world x.
    pub fn looking_down(position: [f32; 3]) -> Self {
        let rotation = [[1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, -1.0]];
        let [px, py, pz] = position;
        Self::new(rotation, [-px, py, pz])
    }

    pub fn apply(&self, point: [f32; 3]) -> [f32; 3] {
        let r = &self.rotation;
        let t = &self.translation;
        [0, 1, 2].map(|i| r[i][0] * point[0] + r[i][1] * point[1] + r[i][2] * point[2] + t[i])
    }
}

/// 8-bit BGR image, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorImage {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl ColorImage {
    /// Image filled with one BGR colour.
    pub fn filled(width: u32, height: u32, bgr: [u8; 3]) -> Self {
        Self {
            width,
            height,
            pixels: vec![bgr; width as usize * height as usize],
        }
    }

    /// Wrap row-major BGR pixels; `None` if the length does not match.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixel(&self, u: u32, v: u32) -> Option<[u8; 3]> {
        if u >= self.width || v >= self.height {
            return None;
        }
        self.pixels
            .get(v as usize * self.width as usize + u as usize)
            .copied()
    }

    pub fn set_pixel(&mut self, u: u32, v: u32, bgr: [u8; 3]) -> bool {
        if u >= self.width || v >= self.height {
            return false;
        }
        let index = v as usize * self.width as usize + u as usize;
        self.pixels[index] = bgr;
        true
    }
}

/// Everything needed to colour a grid from one image.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraFrame {
    pub camera: PinholeCamera,
    pub world_to_camera: RigidTransform,
    pub image: ColorImage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> PinholeCamera {
        PinholeCamera {
            fx: 100.0,
            fy: 100.0,
            cx: 50.0,
            cy: 40.0,
            width: 100,
            height: 80,
        }
    }

    #[test]
    fn test_project_principal_point() {
        assert_eq!(camera().project([0.0, 0.0, 2.0]), Some((50, 40)));
        assert_eq!(camera().project([0.25, -0.2, 1.0]), Some((75, 20)));
    }

    #[test]
    fn test_project_rejects_behind_and_outside() {
        assert_eq!(camera().project([0.0, 0.0, -1.0]), None);
        assert_eq!(camera().project([0.0, 0.0, 0.0]), None);
        assert_eq!(camera().project([1.0, 0.0, 1.0]), None);
        assert_eq!(camera().project([0.0, -0.5, 1.0]), None);
    }

    #[test]
    fn test_looking_down_transform() {
        let tf = RigidTransform::looking_down([1.0, 2.0, 3.0]);
        let below = tf.apply([1.0, 2.0, 0.0]);
        assert_relative_eq!(below[0], 0.0);
        assert_relative_eq!(below[1], 0.0);
        assert_relative_eq!(below[2], 3.0);

        let ahead = tf.apply([1.5, 2.5, 1.0]);
        assert_relative_eq!(ahead[0], 0.5);
        assert_relative_eq!(ahead[1], -0.5);
        assert_relative_eq!(ahead[2], 2.0);
    }

    #[test]
    fn test_image_access() {
        let mut image = ColorImage::filled(4, 3, [1, 2, 3]);
        assert_eq!(image.pixel(3, 2), Some([1, 2, 3]));
        assert_eq!(image.pixel(4, 0), None);
        assert!(image.set_pixel(0, 1, [9, 9, 9]));
        assert_eq!(image.pixel(0, 1), Some([9, 9, 9]));
        assert!(!image.set_pixel(0, 3, [0, 0, 0]));
        assert!(ColorImage::from_pixels(2, 2, vec![[0; 3]; 3]).is_none());
    }
}
