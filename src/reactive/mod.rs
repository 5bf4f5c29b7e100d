/*!
 * Reactive Primitives
 * Observable cells backing every cache entry
 *
 * Cells own their subscriber lists directly: there is no ambient runtime,
 * owner scope or effect scheduler. Whoever holds a handle can read, write
 * or subscribe.
 */

pub mod resource;
pub mod signal;

pub use resource::{Resource, ResourceState};
pub use signal::{Signal, Subscription};
