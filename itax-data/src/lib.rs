//! Loading rate schedules and employee inputs for `itax-core`, plus the
//! logging setup shared by the `itax` binary.

mod error;
pub mod input;
pub mod logging;
mod schedule_file;
mod slab_loader;

pub use error::{InputLoadError, ScheduleLoadError};
pub use input::{load_json, parse_json};
pub use schedule_file::ScheduleFile;
pub use slab_loader::{SlabLoader, SlabRecord};
