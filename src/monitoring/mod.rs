/*!
 * Monitoring
 * Tracing setup for binaries embedding the reactive filesystem
 */

mod tracer;

pub use tracer::init_tracing;
