//! # Optimizer State Serialization
//!
//! Saving and loading optimizers (hyper-parameters, step count and
//! accumulators) so a training run can resume where it stopped.
//! Uses `serde` for serialization and `bincode` as the binary format.

use crate::optim::{OptimError, Optimizer};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

// --- Error Type ---
#[derive(thiserror::Error, Debug)]
pub enum SerializationError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization Error (Bincode): {0}")]
    Bincode(#[from] bincode::Error),
    #[error("Loaded optimizer has an invalid configuration: {0}")]
    InvalidConfig(#[from] OptimError),
}

// --- Save Functions ---

/// Serializes an optimizer into any writer.
pub fn save_to_writer<O, W>(optimizer: &O, writer: W) -> Result<(), SerializationError>
where
    O: Optimizer + Serialize,
    W: Write,
{
    bincode::serialize_into(writer, optimizer)?;
    Ok(())
}

/// Saves an optimizer to a file.
///
/// # Arguments
/// * `optimizer`: The optimizer whose state should be saved.
/// * `path`: The file path where the state will be written (created or truncated).
pub fn save_optimizer<O, P>(optimizer: &O, path: P) -> Result<(), SerializationError>
where
    O: Optimizer + Serialize,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    save_to_writer(optimizer, &mut writer)?;
    writer.flush()?;
    log::debug!(
        "saved optimizer after {} steps to {}",
        optimizer.steps(),
        path.as_ref().display()
    );
    Ok(())
}

// --- Load Functions ---

/// Deserializes an optimizer from any reader and re-checks its hyper-parameters.
pub fn load_from_reader<O, R>(reader: R) -> Result<O, SerializationError>
where
    O: Optimizer + DeserializeOwned,
    R: Read,
{
    let optimizer: O = bincode::deserialize_from(reader)?;
    optimizer.check_config()?;
    Ok(optimizer)
}

/// Loads an optimizer previously written by [`save_optimizer`].
///
/// The restored optimizer continues accumulating from the saved state; its
/// first `step` must use the same layer count and shapes as before.
pub fn load_optimizer<O, P>(path: P) -> Result<O, SerializationError>
where
    O: Optimizer + DeserializeOwned,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let optimizer: O = load_from_reader(reader)?;
    log::debug!(
        "loaded optimizer at step {} from {}",
        optimizer.steps(),
        path.as_ref().display()
    );
    Ok(optimizer)
}
