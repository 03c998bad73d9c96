//! CPU-side sprite mesh built fresh every frame.
//!
//! Quads are appended in painter's order. Each quad records which texture it
//! samples; consecutive quads sharing a texture collapse into a single
//! `draw_indexed` call. Textures are identified by a caller-chosen key `K`
//! that the renderer resolves to a bind group at draw time, so the batch
//! itself never touches the GPU.

use aeroboo_core::geometry::PixelRect;

use crate::vertex::SpriteVertex;

/// What a run of indices samples.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding<K> {
    Texture(K),
    /// The renderer's built-in 1x1 white texture, for flat color fills.
    Solid,
}

/// A contiguous run of indices that share the same texture binding.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall<K> {
    pub binding: Binding<K>,
    pub index_start: u32,
    pub index_count: u32,
}

pub struct SpriteBatch<K> {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall<K>>,
}

impl<K: PartialEq> SpriteBatch<K> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            draw_calls: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.draw_calls.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Draw the whole texture stretched over `rect`.
    pub fn push_sprite(&mut self, texture: K, rect: PixelRect, color: [f32; 4]) {
        self.push_quad(Binding::Texture(texture), rect, color);
    }

    /// Fill `rect` with a flat color.
    pub fn push_fill(&mut self, rect: PixelRect, color: [f32; 4]) {
        self.push_quad(Binding::Solid, rect, color);
    }

    fn push_quad(&mut self, binding: Binding<K>, rect: PixelRect, color: [f32; 4]) {
        let left = rect.x as f32;
        let top = rect.y as f32;
        let right = (rect.x + rect.w) as f32;
        let bottom = (rect.y + rect.h) as f32;
        let base_index = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&[
            SpriteVertex {
                position: [left, top],
                tex_coords: [0.0, 0.0],
                color,
            },
            SpriteVertex {
                position: [right, top],
                tex_coords: [1.0, 0.0],
                color,
            },
            SpriteVertex {
                position: [right, bottom],
                tex_coords: [1.0, 1.0],
                color,
            },
            SpriteVertex {
                position: [left, bottom],
                tex_coords: [0.0, 1.0],
                color,
            },
        ]);

        let draw_start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);

        self.push_draw_call(binding, draw_start, 6);
    }

    /// Append a draw call, merging with the previous one when the binding
    /// matches and the indices are contiguous.
    fn push_draw_call(&mut self, binding: Binding<K>, index_start: u32, index_count: u32) {
        if let Some(last) = self.draw_calls.last_mut() {
            let contiguous = last.index_start + last.index_count == index_start;
            if last.binding == binding && contiguous {
                last.index_count += index_count;
                return;
            }
        }
        self.draw_calls.push(DrawCall {
            binding,
            index_start,
            index_count,
        });
    }
}

impl<K: PartialEq> Default for SpriteBatch<K> {
    fn default() -> Self {
        Self::new()
    }
}
