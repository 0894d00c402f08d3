pub mod entities;
pub mod render;
pub mod requests;
pub mod responses;
