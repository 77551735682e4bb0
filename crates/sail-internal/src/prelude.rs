//! Convenient glob import of the commonly used engine types.
//!
//! ```
//! use sail_internal::prelude::*;
//! ```

#[doc(inline)]
pub use crate::config::SearchPaths;
#[doc(inline)]
pub use crate::detector::probe;
#[doc(inline)]
pub use crate::loader::{DynLibrary, PluginCache, load_plugin};
#[doc(inline)]
pub use crate::registry::{Registry, global, init_global};
#[doc(inline)]
pub use crate::session::{Phase, Session};
#[doc(inline)]
pub use sail_types::prelude::*;
#[doc(inline)]
pub use sail_vfs::{BoxStream, FileStream, IoError, MemoryStream, SeekFrom, Stream, UserStream};
