//! Shape primitives - triangle-list vertices for circles, rings, lines, rects
//!
//! Inputs are already in clip space; `scene` does the pixel conversion.

/// Vertex structure for rendering colored shapes
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x4
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Radius in clip units differs per axis on a non-square canvas
#[derive(Clone, Copy)]
pub struct Radius {
    pub x: f32,
    pub y: f32,
}

fn rim(cx: f32, cy: f32, r: Radius, i: u32, segments: u32) -> [f32; 2] {
    let angle = (i as f32 / segments as f32) * std::f32::consts::TAU;
    [cx + r.x * angle.cos(), cy + r.y * angle.sin()]
}

/// Filled circle (triangle fan unrolled into a list)
pub fn push_circle(out: &mut Vec<Vertex>, cx: f32, cy: f32, r: Radius, color: [f32; 4], segments: u32) {
    for i in 0..segments {
        out.push(Vertex { position: [cx, cy], color });
        out.push(Vertex { position: rim(cx, cy, r, i, segments), color });
        out.push(Vertex { position: rim(cx, cy, r, i + 1, segments), color });
    }
}

/// Circle outline between `inner` and `outer` radii
pub fn push_ring(
    out: &mut Vec<Vertex>,
    cx: f32,
    cy: f32,
    inner: Radius,
    outer: Radius,
    color: [f32; 4],
    segments: u32,
) {
    for i in 0..segments {
        let a0 = rim(cx, cy, inner, i, segments);
        let a1 = rim(cx, cy, inner, i + 1, segments);
        let b0 = rim(cx, cy, outer, i, segments);
        let b1 = rim(cx, cy, outer, i + 1, segments);
        out.extend_from_slice(&[
            Vertex { position: a0, color },
            Vertex { position: b0, color },
            Vertex { position: b1, color },
            Vertex { position: a0, color },
            Vertex { position: b1, color },
            Vertex { position: a1, color },
        ]);
    }
}

/// Line segment as a quad. `half_width` is per axis, like `Radius`.
pub fn push_line(
    out: &mut Vec<Vertex>,
    (x1, y1): (f32, f32),
    (x2, y2): (f32, f32),
    half_width: Radius,
    color: [f32; 4],
) {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-6 {
        return;
    }

    // Perpendicular direction for line thickness
    let px = -dy / len * half_width.x;
    let py = dx / len * half_width.y;

    out.extend_from_slice(&[
        Vertex { position: [x1 - px, y1 - py], color },
        Vertex { position: [x1 + px, y1 + py], color },
        Vertex { position: [x2 + px, y2 + py], color },
        Vertex { position: [x1 - px, y1 - py], color },
        Vertex { position: [x2 + px, y2 + py], color },
        Vertex { position: [x2 - px, y2 - py], color },
    ]);
}

/// Axis-aligned rectangle from two opposite corners
pub fn push_rect(out: &mut Vec<Vertex>, (x1, y1): (f32, f32), (x2, y2): (f32, f32), color: [f32; 4]) {
    out.extend_from_slice(&[
        Vertex { position: [x1, y1], color },
        Vertex { position: [x2, y1], color },
        Vertex { position: [x2, y2], color },
        Vertex { position: [x1, y1], color },
        Vertex { position: [x2, y2], color },
        Vertex { position: [x1, y2], color },
    ]);
}
