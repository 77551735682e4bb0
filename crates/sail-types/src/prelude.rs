//! Convenient glob import of the commonly used SAIL types.
//!
//! ```
//! use sail_types::prelude::*;
//! ```

#[doc(inline)]
pub use crate::codec_info::{CodecInfo, MAGIC_BUFFER_SIZE, SUPPORTED_LAYOUT};
#[doc(inline)]
pub use crate::error::{SailError, SailErrorKind, SailResult};
#[doc(inline)]
pub use crate::features::{IoOption, Priority, ReadFeature, ReadFeatures, WriteFeatures, WriteProperty};
#[doc(inline)]
pub use crate::image::{Image, ImageProperty, Palette, SourceImage};
#[doc(inline)]
pub use crate::meta_data::{MetaDataChain, MetaDataKey, MetaDataNode, ValueType};
#[doc(inline)]
pub use crate::options::{ReadOptions, WriteOptions};
#[doc(inline)]
pub use crate::pixel::{CompressionType, PixelFormat};
