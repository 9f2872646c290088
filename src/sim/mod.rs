/// Step counter with horizon and look-ahead.
pub mod clock;
/// Energy and cost logs with summary report.
pub mod logs;
pub mod microgrid;
pub mod types;

pub use microgrid::Microgrid;
