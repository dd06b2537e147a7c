pub mod health;
pub mod simplify;
pub mod waves;
