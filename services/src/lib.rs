//! Small helpers shared by the backend crates.

pub mod uuid;
