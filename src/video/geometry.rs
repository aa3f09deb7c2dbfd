// Quad geometry - Vertex positions, texture coordinates and projection
//
// The quad spans the padded (power-of-two) texture extent in texel space.
// The projection spans only the logical extent, so the padding lands outside
// the viewport and the logical region maps one texel per logical pixel.

/// Texture coordinates paired with the quad vertices, same winding order
pub const TEX_COORDS: [[u32; 2]; 4] = [[0, 0], [1, 0], [1, 1], [0, 1]];

/// Triangles of the 4-vertex fan; vertex 0 is shared
pub const FAN_TRIANGLES: [[usize; 3]; 2] = [[0, 1, 2], [0, 2, 3]];

/// Smallest power of two greater than or equal to `value`
///
/// Zero rounds up to one. Returns `None` when the result does not fit in a u32.
#[inline]
pub fn next_power_of_two(value: u32) -> Option<u32> {
    value.checked_next_power_of_two()
}

/// Four-vertex quad drawn as a triangle fan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quad {
    /// Corner positions: (0,0), (w,0), (w,h), (0,h)
    pub vertices: [[u32; 2]; 4],
    /// Texture coordinates for each corner
    pub tex_coords: [[u32; 2]; 4],
}

impl Quad {
    /// Quad covering `(0,0)`-`(width,height)`
    pub fn covering(width: u32, height: u32) -> Self {
        Self {
            vertices: [[0, 0], [width, 0], [width, height], [0, height]],
            tex_coords: TEX_COORDS,
        }
    }

    /// Width and height spanned by the vertices
    pub fn extent(&self) -> (u32, u32) {
        (self.vertices[2][0], self.vertices[2][1])
    }
}

/// Orthographic projection with a top-left origin and Y growing downward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ortho {
    /// Logical width mapped onto the viewport
    pub width: u32,
    /// Logical height mapped onto the viewport
    pub height: u32,
}

impl Ortho {
    /// Projection spanning `(0,0)`-`(width,height)`
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Map a logical point to normalized device coordinates
    ///
    /// x grows to the right, NDC y grows upward, so logical y = 0 lands on the top edge.
    pub fn to_ndc(&self, x: f32, y: f32) -> [f32; 2] {
        [
            2.0 * x / self.width as f32 - 1.0,
            1.0 - 2.0 * y / self.height as f32,
        ]
    }

    /// Column-major 4x4 matrix for shader uniforms
    ///
    /// Depth is collapsed to zero.
    pub fn to_matrix(&self) -> [[f32; 4]; 4] {
        let sx = 2.0 / self.width as f32;
        let sy = -2.0 / self.height as f32;
        [
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0],
            [-1.0, 1.0, 0.0, 1.0],
        ]
    }
}
