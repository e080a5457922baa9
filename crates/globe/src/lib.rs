pub mod camera;
pub mod config;
pub mod countries;
pub mod feed;
pub mod interaction;
pub mod landed;
pub mod lifecycle;
pub mod palette;
pub mod picking;
pub mod records;
pub mod scene;

pub use config::{ConfigError, GlobeConfig, Variant};
pub use feed::{OverlayFeed, OverlaySink};
pub use lifecycle::{LifecycleConfig, LifecycleEvent, MessageLifecycle, Submission};
pub use records::{ArcId, ArcRecord, Counters, PointRecord};
