pub mod biquad;
pub mod common;
pub mod echo;
pub mod fuzz;
pub mod identity;
pub mod natural_echo;
pub mod recursive_echo;
pub mod reverb;
pub mod tremolo;
pub mod wah;

pub use biquad::Biquad;
pub use echo::Echo;
pub use fuzz::Fuzz;
pub use identity::Identity;
pub use natural_echo::NaturalEcho;
pub use recursive_echo::RecursiveEcho;
pub use reverb::Reverb;
pub use tremolo::Tremolo;
pub use wah::Wah;
