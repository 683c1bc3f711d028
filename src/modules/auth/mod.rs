pub mod callback;
pub mod extractors;
pub mod handlers;
pub mod providers;
pub mod registry;
pub mod router;
pub mod service;
