use base64::{engine::general_purpose::STANDARD, Engine};

/// Encode raw upload bytes as padded standard base64 for a JSON request body
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Inverse of [`encode`]
pub fn decode(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(text)
}
