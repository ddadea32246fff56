//! Integration tests across the bridge modules
