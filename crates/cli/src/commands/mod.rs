pub mod walk;

pub use walk::WalkArgs;
