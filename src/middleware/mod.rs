/// Middleware module
///
/// Request logging and hit counting.

mod hit_counter;
mod logger;

pub use hit_counter::HitCounterMiddleware;
pub use logger::LoggerMiddleware;
