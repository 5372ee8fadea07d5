mod relay;
mod upload;

pub use relay::*;
pub use upload::*;
