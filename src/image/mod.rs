pub mod f32;
pub mod io;
pub mod raw;

pub use self::f32::ImageF32;
pub use self::raw::{ChannelLayout, RawImage};
