mod normalize;

pub use normalize::{file_name, fold_path};
