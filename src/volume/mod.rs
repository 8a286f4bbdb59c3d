pub mod f32;
pub mod traits;

pub use self::f32::VolumeF32;
pub use self::traits::{Columns, ColumnsMut, VolumeView, VolumeViewMut};
