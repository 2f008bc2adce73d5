mod prober;
mod sweep;


pub use prober::{HealthProber, ProbeResult};
pub use sweep::{HealthSweep, SweepReport};
