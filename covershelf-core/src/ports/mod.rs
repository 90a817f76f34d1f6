pub mod disk;
pub mod http;
pub mod paths;

pub use disk::{CoverFileInfo, CoverFileInfos, DiskProvider};
pub use http::{HeadResponse, HttpClient};
pub use paths::AppPaths;
