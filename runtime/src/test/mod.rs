pub mod helpers;
mod unit;
