pub mod health;
pub mod resources;
pub mod seed;
pub mod settings;
pub mod wishlist;
