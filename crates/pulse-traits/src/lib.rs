use serde::{Serialize, de::DeserializeOwned};

pub use pulse_derive::SaveState;
#[doc(hidden)]
pub use serde_arrays;

pub trait SaveState {
    type Data: Serialize + DeserializeOwned;

    fn save_state(&self) -> Self::Data;
    fn restore_state(&mut self, state: &Self::Data);
}

#[derive(Debug)]
pub enum Error {
    Encode(postcard::Error),
    Decode(postcard::Error),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Encode(e) | Error::Decode(e) => Some(e),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Encode(e) => write!(f, "unable to encode save state: {e}"),
            Error::Decode(e) => write!(f, "unable to decode save state: {e}"),
        }
    }
}

pub trait BinarySaveState {
    fn binary_save_state(&self) -> Result<Vec<u8>, Error>;
    fn binary_restore_state(&mut self, state: &[u8]) -> Result<(), Error>;
}

impl<T: SaveState> BinarySaveState for T {
    fn binary_save_state(&self) -> Result<Vec<u8>, Error> {
        let data = self.save_state();
        postcard::to_allocvec(&data).map_err(Error::Encode)
    }

    /// The target is left untouched when the bytes do not decode.
    fn binary_restore_state(&mut self, state: &[u8]) -> Result<(), Error> {
        let data = postcard::from_bytes::<T::Data>(state).map_err(Error::Decode)?;
        self.restore_state(&data);
        Ok(())
    }
}
