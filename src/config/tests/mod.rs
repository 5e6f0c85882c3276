//! Unit tests for configuration loading and validation.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Token, mode, selector and worker resolution tests
//! - `validation`: Required and mutually exclusive option tests

mod helpers;
