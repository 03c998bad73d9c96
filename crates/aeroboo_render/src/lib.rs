pub mod batch;
pub mod camera;
pub mod color;
pub mod gpu_context;
pub mod renderer;
pub mod sprite_pipeline;
pub mod texture;
pub mod vertex;

pub use batch::{Binding, DrawCall, SpriteBatch};
pub use camera::{CameraUniform, ScreenCamera};
pub use gpu_context::GpuContext;
pub use renderer::SpriteRenderer;
pub use sprite_pipeline::{SpritePipeline, SpriteTexture};
pub use texture::Texture;
pub use vertex::SpriteVertex;
