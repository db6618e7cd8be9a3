pub mod middleware;
pub mod voice;
#[cfg(test)]
mod tests;
pub use voice::router;
