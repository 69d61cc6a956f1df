pub mod compositing;
pub mod keying;
pub mod pipeline;
pub mod shared;
pub mod tasks;
pub mod video;

#[cfg(test)]
mod test_support;
