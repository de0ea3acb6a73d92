//! Serialization of fitted model parameters.
//!
//! Parameter representations hold plain numerical data only (`Vec<f64>`,
//! node arenas, scalars). Anything `serde`-serializable gets a bincode-backed
//! [`SerializableParams`] implementation for free.

use std::error::Error;

/// Parameter representations that can be serialized to and from bytes.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Params {
        weights: Vec<f64>,
        bias: f64,
    }

    #[test]
    fn test_bytes_are_exact_for_f64() {
        let p = Params {
            weights: vec![0.1, 1.0 / 3.0, f64::MIN_POSITIVE],
            bias: -2.5e-300,
        };
        let bytes = p.to_bytes().unwrap();
        let q = Params::from_bytes(&bytes).unwrap();
        for (a, b) in p.weights.iter().zip(&q.weights) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
        assert_eq!(p, q);
    }

    #[test]
    fn test_truncated_bytes_fail() {
        let bytes = Params {
            weights: vec![1.0, 2.0],
            bias: 0.0,
        }
        .to_bytes()
        .unwrap();
        assert!(Params::from_bytes(&bytes[..bytes.len() - 3]).is_err());
    }
}
