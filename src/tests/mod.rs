//! End-to-end scenarios against the published test vectors, exercising
//! [`crate::EncryptionCore`] across every historical token format.
