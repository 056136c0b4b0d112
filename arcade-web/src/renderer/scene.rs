//! Scene rendering - turns the frame's draw list into one triangle list

use super::shapes::{push_circle, push_line, push_rect, push_ring, Radius, Vertex};
use super::state::{GPU_STATE, MAX_VERTICES};
use crate::engine::{DrawList, Shape};
use crate::physics::CanvasSize;

/// The camera video sits under the canvas
const BACKGROUND: wgpu::Color = wgpu::Color::TRANSPARENT;

/// Canvas pixels to clip space (-1 to 1), flip Y
struct ClipSpace {
    sx: f32,
    sy: f32,
}

impl ClipSpace {
    fn new(canvas: CanvasSize) -> Self {
        Self {
            sx: 2.0 / canvas.width,
            sy: 2.0 / canvas.height,
        }
    }

    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.sx - 1.0, 1.0 - y * self.sy)
    }

    fn radius(&self, r: f32) -> Radius {
        Radius { x: r * self.sx, y: r * self.sy }
    }
}

/// Fewer segments for small circles; particles are tiny and numerous
fn segments_for(radius_px: f32) -> u32 {
    if radius_px < 6.0 {
        8
    } else if radius_px < 24.0 {
        16
    } else {
        32
    }
}

pub fn build_scene_vertices(list: &DrawList, canvas: CanvasSize) -> Vec<Vertex> {
    let clip = ClipSpace::new(canvas);
    let mut vertices = Vec::with_capacity(list.shapes().len() * 12);

    for shape in list.shapes() {
        match *shape {
            Shape::Circle { x, y, radius, color } => {
                let (cx, cy) = clip.point(x, y);
                push_circle(&mut vertices, cx, cy, clip.radius(radius), color, segments_for(radius));
            }
            Shape::Ring { x, y, radius, width, color } => {
                let (cx, cy) = clip.point(x, y);
                let inner = clip.radius((radius - width * 0.5).max(0.0));
                let outer = clip.radius(radius + width * 0.5);
                push_ring(&mut vertices, cx, cy, inner, outer, color, segments_for(radius));
            }
            Shape::Line { x1, y1, x2, y2, width, color } => {
                push_line(
                    &mut vertices,
                    clip.point(x1, y1),
                    clip.point(x2, y2),
                    clip.radius(width * 0.5),
                    color,
                );
            }
            Shape::Rect { x, y, w, h, color } => {
                push_rect(&mut vertices, clip.point(x, y), clip.point(x + w, y + h), color);
            }
        }
    }

    vertices
}

/// Render one frame from a draw list
pub fn render_draw_list(list: &DrawList, canvas: CanvasSize) {
    GPU_STATE.with(|state_cell| {
        let mut state_ref = state_cell.borrow_mut();
        let Some(state) = state_ref.as_mut() else {
            return;
        };
        state.resize(canvas);

        let mut vertices = build_scene_vertices(list, canvas);
        if vertices.len() > MAX_VERTICES {
            log::warn!("scene truncated: {} vertices", vertices.len());
            vertices.truncate(MAX_VERTICES - MAX_VERTICES % 3);
        }

        let output = match state.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::debug!("no surface texture: {:?}", e);
                return;
            }
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = state.device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor { label: Some("Scene Encoder") }
        );

        if !vertices.is_empty() {
            state.queue.write_buffer(&state.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if !vertices.is_empty() {
                pass.set_pipeline(&state.render_pipeline);
                pass.set_vertex_buffer(0, state.vertex_buffer.slice(..));
                pass.draw(0..vertices.len() as u32, 0..1);
            }
        }

        state.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    });
}
