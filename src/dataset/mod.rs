pub mod columns;
pub mod error;
pub mod loader;
pub mod record;
