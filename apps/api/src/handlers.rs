pub mod access;
pub mod business;
pub mod catalog;
pub mod health;
pub mod navigation;
pub mod session;
