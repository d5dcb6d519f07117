//! Everything on the card besides the fireworks: the opening sequence,
//! title, letter, music and the small decorations.

pub mod hearts;
pub mod letter;
pub mod motes;
pub mod music;
pub mod sequence;
pub mod sparkle;
pub mod title;

pub use hearts::Hearts;
pub use letter::Letter;
pub use motes::Motes;
pub use music::Music;
pub use sequence::{Cue, Sequencer};
pub use sparkle::CursorTrail;
pub use title::Title;
