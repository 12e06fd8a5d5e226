use crate::core::types::RequestId;

pub trait FromRandom {
    fn from_random() -> Self;
}

impl FromRandom for RequestId {
    fn from_random() -> Self {
        RequestId(random_string(16))
    }
}

fn random_string(size: usize) -> String {
    use rand::Rng;

    rand::thread_rng()
        .sample_iter(rand::distributions::Alphanumeric)
        .take(size)
        .map(char::from)
        .collect()
}
