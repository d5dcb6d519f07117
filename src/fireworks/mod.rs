//! Rising shells, their debris, and the frame loop that launches them.

pub mod firework;
pub mod palette;
pub mod particle;
pub mod scheduler;
pub mod show;

pub use scheduler::DensityMode;
pub use show::FireworksShow;
