use std::hash::{Hash, Hasher};

use twox_hash::XxHash64;

pub(crate) fn content_hash(content: &str) -> u64 {
    let mut hasher = XxHash64::default();
    content.hash(&mut hasher);
    hasher.finish()
}
