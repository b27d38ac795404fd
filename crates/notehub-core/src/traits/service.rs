//! Service marker trait.

/// Marker trait for business logic services.
///
/// All services in `notehub-service` implement this trait so they can be
/// shared behind `Arc` across request workers.
pub trait Service: Send + Sync + 'static {}
