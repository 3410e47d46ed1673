use crate::FetchGeneration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartFetch {
        generation: FetchGeneration,
        url: String,
    },
    CancelFetch {
        generation: FetchGeneration,
    },
}
