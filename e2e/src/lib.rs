pub mod stub;
pub mod util;

#[cfg(test)]
mod tests;
