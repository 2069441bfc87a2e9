pub mod id;
pub mod resource;
