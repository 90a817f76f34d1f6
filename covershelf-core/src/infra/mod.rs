pub mod atomic_file;
pub mod local_disk;
pub mod reqwest_http;
pub mod static_paths;
pub mod ttl_cache;

pub use local_disk::LocalDiskProvider;
pub use reqwest_http::ReqwestHttpClient;
pub use static_paths::StaticAppPaths;
pub use ttl_cache::TtlCache;
