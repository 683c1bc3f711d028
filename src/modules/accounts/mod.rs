pub mod dtos;
pub mod entities;
pub mod handlers;
pub mod infra;
pub mod repository;
pub mod router;
