pub mod animation;
pub mod chroma_key;
pub mod geometry;
pub mod input;
pub mod time;
