use std::io;

/// Serializes a message with the default bitcode codec.
pub fn encode<T>(value: &T) -> Result<Vec<u8>, io::Error>
where
    T: bitcode::Encode + ?Sized,
{
    Ok(bitcode::encode(value))
}

/// Deserializes a message with the default bitcode codec. Any decode
/// failure is reported as [`io::ErrorKind::InvalidData`].
pub fn decode<T>(bytes: &[u8]) -> Result<T, io::Error>
where
    T: for<'a> bitcode::Decode<'a>,
{
    bitcode::decode::<T>(bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}
