pub mod clients;
pub mod rest;
