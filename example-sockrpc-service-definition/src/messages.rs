use bitcode::{Decode, Encode};

#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageString {
    pub value: String,
}

impl MessageString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageCount {
    pub count: u64,
}

#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageWeather {
    pub location: String,
    pub temperature: i32,
}

/// Result of methods that have nothing to report.
#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Void;
