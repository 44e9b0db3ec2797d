pub mod errors;
pub mod db;
pub mod signature;

#[cfg(test)]
mod tests;
