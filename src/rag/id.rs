use sha2::{Digest, Sha256};

/// Builds the identifier of a chunk
///
/// The id is the first 8 hex digits of the SHA-256 of the source URL, the
/// first 12 hex digits of the SHA-256 of the content, and the position,
/// joined by dashes. The same content at the same place of the same page
/// always gets the same id.
///
/// # Examples
///
/// ```
/// use doc_harvest::rag::chunk_id;
///
/// let id = chunk_id("Hello", "https://docs.example.com/", 0);
/// assert_eq!(id, chunk_id("Hello", "https://docs.example.com/", 0));
/// assert!(id.ends_with("-0"));
/// assert_eq!(id.len(), 8 + 1 + 12 + 1 + 1);
/// ```
pub fn chunk_id(content: &str, source_url: &str, position: usize) -> String {
    let url_hash = hex::encode(Sha256::digest(source_url.as_bytes()));
    let content_hash = hex::encode(Sha256::digest(content.as_bytes()));

    format!("{}-{}-{}", &url_hash[..8], &content_hash[..12], position)
}
