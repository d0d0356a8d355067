mod tracing;

pub use tracing::init as init_tracing;
pub use tracing_appender::non_blocking::WorkerGuard;
