pub mod existence;
pub mod limiter;
pub mod paths;
pub mod proxy;
pub mod resizer;
pub mod service;

pub use existence::CoverExistenceCheck;
pub use limiter::{ResizeLimiter, ResizePermit};
pub use proxy::CoverProxy;
pub use resizer::{ImageCrateResizer, ImageResizer};
pub use service::MediaCoverService;
