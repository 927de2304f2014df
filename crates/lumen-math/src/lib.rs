//! Footprint geometry for lighting volumes: oriented boxes under non-uniform
//! scale and rotation, with closest-point and distance queries.

mod oriented_box;
mod transform;

pub use oriented_box::OrientedBox;
pub use transform::VolumeTransform;
