pub mod domain;
pub mod repository;
pub mod sanitize;
pub mod service;
pub mod validation;
