use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },

    /// Flat annulus in the XY plane, facing +Z.
    Ring {
        inner_radius: f32,
        outer_radius: f32,
        theta_segments: u32,
        phi_segments: u32,
    },
}

/// Triangle list ready for upload.
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Geometry::Sphere {
            radius,
            width_segments: width_segments.max(3),
            height_segments: height_segments.max(2),
        }
    }

    pub fn ring(inner_radius: f32, outer_radius: f32, theta_segments: u32, phi_segments: u32) -> Self {
        Geometry::Ring {
            inner_radius,
            outer_radius,
            theta_segments: theta_segments.max(3),
            phi_segments: phi_segments.max(1),
        }
    }

    /// Radius of a sphere around the local origin enclosing the geometry.
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Geometry::Sphere { radius, .. } => radius,
            Geometry::Ring { outer_radius, .. } => outer_radius,
        }
    }

    pub fn tessellate(&self) -> GeometryData {
        match *self {
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere(radius, width_segments, height_segments),
            Geometry::Ring {
                inner_radius,
                outer_radius,
                theta_segments,
                phi_segments,
            } => ring(inner_radius, outer_radius, theta_segments, phi_segments),
        }
    }
}

fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::default();

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;

        // Poles share a position; shift their u so the texture does not pinch.
        let u_offset = if iy == 0 {
            0.5 / width_segments as f32
        } else if iy == height_segments {
            -0.5 / width_segments as f32
        } else {
            0.0
        };

        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;

            let x = -radius * (u * 2.0 * PI).cos() * (v * PI).sin();
            let y = radius * (v * PI).cos();
            let z = radius * (u * 2.0 * PI).sin() * (v * PI).sin();

            data.positions.push([x, y, z]);
            data.normals.push([x / radius, y / radius, z / radius]);
            data.tex_coords.push([u + u_offset, 1.0 - v]);
        }
    }

    let row = width_segments + 1;
    let grid = |iy: u32, ix: u32| iy * row + ix;

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = grid(iy, ix + 1);
            let b = grid(iy, ix);
            let c = grid(iy + 1, ix);
            let d = grid(iy + 1, ix + 1);

            if iy != 0 {
                data.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                data.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    data
}

fn ring(inner_radius: f32, outer_radius: f32, theta_segments: u32, phi_segments: u32) -> GeometryData {
    let mut data = GeometryData::default();
    let radius_step = (outer_radius - inner_radius) / phi_segments as f32;

    for j in 0..=phi_segments {
        let radius = inner_radius + j as f32 * radius_step;

        for i in 0..=theta_segments {
            let segment = i as f32 / theta_segments as f32 * 2.0 * PI;
            let x = radius * segment.cos();
            let y = radius * segment.sin();

            data.positions.push([x, y, 0.0]);
            data.normals.push([0.0, 0.0, 1.0]);
            data.tex_coords.push([
                (x / outer_radius + 1.0) / 2.0,
                (y / outer_radius + 1.0) / 2.0,
            ]);
        }
    }

    for j in 0..phi_segments {
        let level = j * (theta_segments + 1);

        for i in 0..theta_segments {
            let a = level + i;
            let b = a + theta_segments + 1;
            let c = a + theta_segments + 2;
            let d = a + 1;

            data.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn sphere_vertex_and_triangle_counts() {
        let data = Geometry::sphere(15.0, 30, 30).tessellate();

        assert_eq!(data.positions.len(), 31 * 31);
        assert_eq!(data.normals.len(), data.positions.len());
        assert_eq!(data.tex_coords.len(), data.positions.len());

        // Pole rows contribute one triangle per segment, the others two.
        assert_eq!(data.indices.len(), 3 * 2 * 30 * 29);
        assert!(data
            .indices
            .iter()
            .all(|&i| (i as usize) < data.positions.len()));
    }

    #[test]
    fn sphere_vertices_lie_on_the_surface() {
        let data = Geometry::sphere(3.0, 12, 8).tessellate();

        for (p, n) in data.positions.iter().zip(data.normals.iter()) {
            let length = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert_relative_eq!(length, 3.0, epsilon = 1e-4);
            assert_relative_eq!(p[0] / 3.0, n[0], epsilon = 1e-5);
        }

        assert_relative_eq!(data.positions[0][1], 3.0, epsilon = 1e-5);
        assert_relative_eq!(data.positions.last().unwrap()[1], -3.0, epsilon = 1e-5);
    }

    #[test]
    fn ring_spans_inner_to_outer_radius() {
        let data = Geometry::ring(6.0, 10.0, 30, 1).tessellate();

        assert_eq!(data.positions.len(), 2 * 31);
        assert_eq!(data.indices.len(), 30 * 6);

        let radii: Vec<f32> = data
            .positions
            .iter()
            .map(|p| (p[0] * p[0] + p[1] * p[1]).sqrt())
            .collect();
        assert_relative_eq!(radii[0], 6.0, epsilon = 1e-4);
        assert_relative_eq!(*radii.last().unwrap(), 10.0, epsilon = 1e-4);
        assert!(data.positions.iter().all(|p| p[2] == 0.0));
    }

    #[test]
    fn degenerate_segment_counts_are_raised() {
        assert_eq!(
            Geometry::sphere(1.0, 0, 0),
            Geometry::Sphere {
                radius: 1.0,
                width_segments: 3,
                height_segments: 2,
            }
        );
        assert_eq!(Geometry::ring(1.0, 2.0, 30, 1).bounding_radius(), 2.0);
    }
}
