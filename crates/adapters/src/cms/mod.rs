//! Headless CMS adapters

mod stub;
mod wisp;

pub use stub::{StubCms, StubOperation};
pub use wisp::{DEFAULT_BASE_URL, WispClient};
