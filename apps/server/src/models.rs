use serde::Serialize;

/// Success envelope wrapping a payload.
#[derive(Serialize, Debug, Clone)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Success envelope for mutations that return no payload.
#[derive(Serialize, Debug, Clone)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
