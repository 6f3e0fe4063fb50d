// Export all route modules
pub mod fondos;

// Re-export all route handlers for easy importing
pub use fondos::*;
