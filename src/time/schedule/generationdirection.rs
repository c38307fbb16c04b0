use serde::Deserialize;

/// Which end of the schedule the regular periods are stepped from.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Deserialize)]
pub enum GenerationDirection {
    Forward = 1,
    Backward = -1,
}

impl GenerationDirection {
    pub fn sign(&self) -> i32 {
        *self as i32
    }
}
