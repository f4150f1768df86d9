pub mod io;
pub mod resample;
pub mod traits;
pub mod u8;

pub use self::io::GrayImageU8;
pub use self::resample::{resize_bilinear_into, ResampleBuffer};
pub use self::traits::{ImageView, Rows};
pub use self::u8::ImageU8;
