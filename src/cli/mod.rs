pub mod assets;
pub mod purchase;
pub mod quote;
pub mod review;
pub mod setup;
pub mod ui;
