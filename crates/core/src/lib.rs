//! infocode-core: information-theoretic source and channel coding
//!
//! This library provides the codecs and simulators behind a learning-focused
//! coding workbench that:
//! - Estimates PMFs, entropy and relative entropy of symbol sequences
//! - Builds fixed-length, Huffman and Shannon-Fano prefix codes
//! - Compresses with adaptive arithmetic coding and LZ78
//! - Protects bits with repetition and Hamming block codes
//! - Simulates BPSK over AWGN and Rayleigh fading, and the binary symmetric
//!   channel, measuring bit error rates
//!
//! # Architecture
//!
//! - `bitio`: bit strings and bit-level reading/writing
//! - `model`: PMF, entropy and channel entropy measures
//! - `prefix`: prefix code tables, builders and the generic codec
//! - `arithmetic`: exact adaptive arithmetic coder
//! - `lz78`: dictionary coder with binary packing
//! - `block`: repetition and Hamming channel codes
//! - `channel`: noisy channel simulation and BER sweeps
//! - `report`: per-sequence and batch coding reports
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and recoverable
//! - **Per-call state**: Adaptive models and dictionaries never outlive one call
//! - **Deterministic**: Randomness is injected, so seeded runs reproduce exactly

pub mod arithmetic;
pub mod bitio;
pub mod block;
pub mod channel;
pub mod error;
pub mod lz78;
pub mod model;
pub mod prefix;
pub mod report;

// Re-export commonly used types
pub use bitio::BitString;
pub use block::{BlockCode, CodingScheme};
pub use channel::{ChannelKind, SimulationConfig};
pub use error::{Error, Result};
pub use model::{EntropyModel, Pmf, Symbol};
pub use prefix::CodeTable;
