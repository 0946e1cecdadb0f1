pub mod models;

pub use models::{Comment, Photo, Profile, User};
