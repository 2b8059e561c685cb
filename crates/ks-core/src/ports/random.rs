/// Source of unbiased random bits.
pub trait RandomSourcePort: Send + Sync {
    /// One bit from a cryptographically strong source, or `None` when no such
    /// source is available on this platform.
    fn secure_bit(&self) -> Option<bool>;
}
