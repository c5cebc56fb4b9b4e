/*
 * Copyright (c) Facebook, Inc. and its affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

// https://blog.burntsushi.net/rust-error-handling/
use thiserror::Error;

pub type LandmarkResult<T> = std::result::Result<T, LandmarkError>;

#[derive(Debug, Error)]
pub enum LandmarkError {
    #[error("{0}")]
    Generic(String),

    #[error("I/O error: {0}")]
    IO(#[from] std::io::Error),

    #[error("createLandmarks/loadExisting called on an already-initialized storage")]
    AlreadyInitialized,

    #[error("persisted coreNodeCount {persisted} does not match current graph's {current}")]
    GraphMismatch { persisted: i32, current: i32 },

    #[error("factor is non-finite or factor * 1e6 exceeds i32::MAX")]
    FactorOverflow,

    #[error("weight {0} would exceed i32::MAX before quantisation")]
    ValueOutOfRange(f64),

    #[error("component count {0} exceeds the 127 subnetworks a signed byte can address")]
    TooManySubnetworks(usize),

    #[error("query endpoints lie in different subnetworks ({from} vs {to})")]
    DisconnectedSubnetworks { from: i8, to: i8 },

    #[error("query endpoint lies in an unset or unclear subnetwork")]
    UnreachableSubnetwork,

    #[error("landmark suggestion list has {got} ids, need at least {need}")]
    InsufficientSuggestions { got: usize, need: usize },

    #[error("build was cancelled")]
    Cancelled,
}

impl LandmarkError {
    pub fn new(msg: &str) -> Self {
        Self::Generic(msg.to_owned())
    }
}

impl From<String> for LandmarkError {
    fn from(s: String) -> Self {
        LandmarkError::Generic(s)
    }
}

impl From<&str> for LandmarkError {
    fn from(s: &str) -> Self {
        LandmarkError::Generic(s.to_owned())
    }
}
