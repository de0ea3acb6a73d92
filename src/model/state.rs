/// A marker type indicating that a model is **not yet trained**.
///
/// `RandomForest<Unfitted>` only carries hyperparameters; `predict` is not
/// available on it, which rules out using an untrained model by accident.
#[derive(Clone, Copy, Debug)]
pub struct Unfitted;

/// A marker type indicating that a model has been **fully trained**.
///
/// A `Fitted` model implements [`InferenceModel`](super::InferenceModel) and
/// can be written to an artifact. It is never mutated after construction.
#[derive(Clone, Copy, Debug)]
pub struct Fitted;
