//! Domain types for job postings and applications

pub mod entities;
