//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Idx2d, Idx3d};

pub use crate::consts::gray::{BACKGROUND, FOREGROUND};

pub use crate::mask::registry::{default_mask, mask_by_name, mask_names};
pub use crate::mask::{ChamferMask, MaskDim, Offset};
pub use crate::numeric::{DistanceValue, WeightRounding};

pub use crate::transform::{
    distance_map, distance_map_3d, label_distance_map, label_distance_map_3d, DistanceTransform,
};

pub use crate::geodesic::{
    geodesic_distance_map, geodesic_distance_map_3d, GeodesicTransform, Seeds, Strategy,
};

pub use crate::{ChamferError, ChamferResult, Monitor};
